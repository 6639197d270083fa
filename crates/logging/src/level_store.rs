//! crates/logging/src/level_store.rs
//! Mutex-guarded severity threshold shared by emitters and listeners.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::severity::Severity;

/// Current severity threshold.
///
/// Reads and writes go through one mutex so a listener thread can replace the
/// threshold while any number of application threads consult it. The store
/// performs no validation: a [`Severity`] cannot hold an out-of-range rank,
/// and raw wire values are checked by the listener before they reach
/// [`set`](Self::set).
///
/// A poisoned lock is recovered rather than propagated; the guarded value is
/// a plain `Copy` scalar that cannot be left half-updated.
#[derive(Debug)]
pub struct LevelStore {
    threshold: Mutex<Severity>,
}

impl LevelStore {
    /// Creates a store holding `initial`.
    #[must_use]
    pub const fn new(initial: Severity) -> Self {
        Self {
            threshold: Mutex::new(initial),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Severity> {
        self.threshold.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current threshold.
    pub fn get(&self) -> Severity {
        *self.lock()
    }

    /// Replaces the threshold.
    pub fn set(&self, threshold: Severity) {
        *self.lock() = threshold;
    }

    /// Replaces the threshold and returns the previous value.
    pub fn replace(&self, threshold: Severity) -> Severity {
        std::mem::replace(&mut *self.lock(), threshold)
    }

    /// Reports whether a record at `level` passes the current threshold.
    pub fn enabled(&self, level: Severity) -> bool {
        self.get().permits(level)
    }
}

impl Default for LevelStore {
    fn default() -> Self {
        Self::new(Severity::DEFAULT)
    }
}
