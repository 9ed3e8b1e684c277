//! Cumulative record of written artifact locations.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::error::RecoveryError;

/// Thread-safe, insertion-ordered log of every location one controller
/// instance has written.
///
/// Appends are monotonic: locations are never removed while the job
/// runs, and re-recording a location already present is a no-op.
/// Incremental exports rewrite the same files every cycle, so the
/// dedup is what lets cleanup visit each location exactly once.
#[derive(Debug, Default)]
pub struct ArtifactTrail {
    inner: Mutex<TrailInner>,
}

#[derive(Debug, Default)]
struct TrailInner {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ArtifactTrail {
    /// Create an empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one written location.
    pub fn record(&self, location: impl Into<String>) {
        let location = location.into();
        let mut inner = self.inner.lock();
        if inner.seen.insert(location.clone()) {
            inner.order.push(location);
        }
    }

    /// Record every location, preserving the given order.
    pub fn record_all<I>(&self, locations: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut inner = self.inner.lock();
        for location in locations {
            if inner.seen.insert(location.clone()) {
                inner.order.push(location);
            }
        }
    }

    /// Number of distinct locations recorded.
    pub fn len(&self) -> usize {
        self.inner.lock().order.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().order.is_empty()
    }

    /// Copy of the recorded locations in first-write order.
    pub fn snapshot(&self) -> Vec<String> {
        self.inner.lock().order.clone()
    }

    /// Consume the trail, returning the locations in first-write order.
    pub fn into_locations(self) -> Vec<String> {
        self.inner.into_inner().order
    }
}

/// Outcome of best-effort artifact cleanup.
///
/// Cleanup never aborts early; a failed delete is recorded here and the
/// remaining deletions proceed.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Locations the controller attempted to delete.
    pub attempted: usize,
    /// Locations successfully deleted.
    pub deleted: usize,
    /// Locations that could not be deleted, with the storage error.
    pub failed: Vec<(String, RecoveryError)>,
}

impl CleanupReport {
    /// Whether every attempted deletion succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
