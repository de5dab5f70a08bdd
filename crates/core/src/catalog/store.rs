//! Live catalog state: the currently installed catalog and its
//! freshness clock.

use arc_swap::ArcSwap;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use super::types::{CacheSnapshot, Catalog};

/// Freshness of the live catalog.
///
/// `Refreshing` is the in-flight sentinel: distinguishable from both
/// fresh and stale, so the staleness check and the overlapping-cycle
/// guard share one state variable. It carries the prior stamp so an
/// aborted cycle restores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// No catalog has ever been installed.
    Never,
    /// A fetch cycle is in flight.
    Refreshing { previous: Option<DateTime<Utc>> },
    /// Stamp of the last successful install.
    UpdatedAt(DateTime<Utc>),
}

/// Owner of the live [`Catalog`] and its staleness clock.
///
/// The catalog swaps atomically: queries load the current `Arc` without
/// ever blocking on an in-flight rebuild, and only whole catalogs are
/// installed, never individual entries.
pub struct CatalogStore {
    catalog: ArcSwap<Catalog>,
    freshness: Mutex<Freshness>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            catalog: ArcSwap::from_pointee(Catalog::new()),
            freshness: Mutex::new(Freshness::Never),
        }
    }

    fn freshness_mut(&self) -> std::sync::MutexGuard<'_, Freshness> {
        self.freshness.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait-free read of the live catalog.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.load_full()
    }

    pub fn freshness(&self) -> Freshness {
        *self.freshness_mut()
    }

    /// Install a previously persisted snapshot as the live catalog.
    pub fn seed(&self, snapshot: CacheSnapshot) {
        let Some(stamp) = snapshot.stamped_at() else {
            debug!(millis = snapshot.last_update, "Ignoring snapshot with unusable stamp");
            return;
        };
        self.catalog.store(Arc::new(snapshot.card_cache));
        *self.freshness_mut() = Freshness::UpdatedAt(stamp);
    }

    /// True when the catalog must be rebuilt before being trusted. An
    /// in-flight cycle reads as not stale so a second trigger is a no-op.
    pub fn is_stale(&self, now: DateTime<Utc>, window: Duration) -> bool {
        match *self.freshness_mut() {
            Freshness::Never => true,
            Freshness::Refreshing { .. } => false,
            Freshness::UpdatedAt(stamp) => now.signed_duration_since(stamp) >= window,
        }
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(*self.freshness_mut(), Freshness::Refreshing { .. })
    }

    /// Enter the refreshing state. Returns false when a cycle is already
    /// in flight, in which case the caller must not start another.
    pub fn begin_refresh(&self) -> bool {
        let mut freshness = self.freshness_mut();
        match *freshness {
            Freshness::Refreshing { .. } => false,
            Freshness::Never => {
                *freshness = Freshness::Refreshing { previous: None };
                true
            }
            Freshness::UpdatedAt(stamp) => {
                *freshness = Freshness::Refreshing {
                    previous: Some(stamp),
                };
                true
            }
        }
    }

    /// Install a freshly built catalog and stamp it.
    pub fn complete_refresh(&self, catalog: Catalog, now: DateTime<Utc>) {
        self.catalog.store(Arc::new(catalog));
        *self.freshness_mut() = Freshness::UpdatedAt(now);
    }

    /// Leave the refreshing state without touching the live catalog,
    /// restoring the stamp the cycle started from.
    pub fn abort_refresh(&self) {
        let mut freshness = self.freshness_mut();
        if let Freshness::Refreshing { previous } = *freshness {
            *freshness = match previous {
                Some(stamp) => Freshness::UpdatedAt(stamp),
                None => Freshness::Never,
            };
        }
    }
}
