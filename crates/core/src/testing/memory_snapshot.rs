//! In-memory snapshot store for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::catalog::{CacheSnapshot, SnapshotError, SnapshotStore};

/// [`SnapshotStore`] that keeps the snapshot in memory.
///
/// Records how often `save` ran and can be told to fail saves, so tests
/// can assert that a failed persist never rolls back the live catalog.
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshot: Mutex<Option<CacheSnapshot>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a snapshot, as if a previous run
    /// had persisted it.
    pub fn with_snapshot(snapshot: CacheSnapshot) -> Self {
        let store = Self::new();
        *store.lock() = Some(snapshot);
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CacheSnapshot>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The most recently saved snapshot.
    pub fn saved(&self) -> Option<CacheSnapshot> {
        self.lock().clone()
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make every subsequent `save` fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Option<CacheSnapshot> {
        self.lock().clone()
    }

    fn save(&self, snapshot: &CacheSnapshot) -> Result<(), SnapshotError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SnapshotError::Write(std::io::Error::other(
                "injected save failure",
            )));
        }
        *self.lock() = Some(snapshot.clone());
        Ok(())
    }
}
