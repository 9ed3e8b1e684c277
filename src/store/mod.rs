//! Storage adapters for checkpoint artifacts.
//!
//! The controller talks to storage exclusively through the
//! [`ObjectStore`] trait: atomic writes, whole-object reads, existence
//! probes, and deletes over a logical path namespace. Two adapters ship
//! with the crate: [`LocalStore`] for the local filesystem and
//! [`MemStore`] for tests and ephemeral runs.

mod local;
mod memory;
mod traits;

pub use local::LocalStore;
pub use memory::MemStore;
pub use traits::ObjectStore;
