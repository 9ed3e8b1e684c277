//! Registry of resume routines, keyed by recoverable type name.

use std::collections::HashMap;
use std::fmt;

use crate::error::Result;
use crate::key::ObjectKey;

use super::Recovery;

/// A resume routine: rebuilds a checkpointed job from its recovered
/// keys and carries on under the supplied controller.
pub type ResumeFn = Box<dyn Fn(&ObjectKey, &ObjectKey, Recovery) -> Result<()> + Send + Sync>;

/// Maps recoverable type names to the routines that resume them.
///
/// The surrounding system registers one routine per supported
/// recoverable at process start; `auto_recover` dispatches through the
/// registry when a checkpoint pointer is found.
#[derive(Default)]
pub struct ResumeRegistry {
    routines: HashMap<String, ResumeFn>,
}

impl ResumeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `routine` for `type_name`, replacing any earlier entry
    /// under the same name.
    pub fn register<F>(&mut self, type_name: impl Into<String>, routine: F)
    where
        F: Fn(&ObjectKey, &ObjectKey, Recovery) -> Result<()> + Send + Sync + 'static,
    {
        self.routines.insert(type_name.into(), Box::new(routine));
    }

    /// Look up the routine registered for `type_name`.
    pub fn get(&self, type_name: &str) -> Option<&ResumeFn> {
        self.routines.get(type_name)
    }

    /// Whether a routine is registered for `type_name`.
    pub fn supports(&self, type_name: &str) -> bool {
        self.routines.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routines.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ResumeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResumeRegistry")
            .field("routines", &self.names())
            .finish()
    }
}
