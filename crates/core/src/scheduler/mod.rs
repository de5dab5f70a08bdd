//! Staleness-driven refresh scheduling.
//!
//! A refresh cycle runs as a detached task: callers never await it, and
//! the store's refreshing sentinel guarantees at most one cycle is in
//! flight. A cycle that fails leaves the previously live catalog and
//! its stamp untouched.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::catalog::{CacheSnapshot, CatalogStore, SnapshotStore};
use crate::fetcher::CatalogFetcher;
use crate::metrics;

#[derive(Clone)]
pub struct RefreshScheduler {
    store: Arc<CatalogStore>,
    fetcher: Arc<CatalogFetcher>,
    snapshots: Arc<dyn SnapshotStore>,
    window: Duration,
}

impl RefreshScheduler {
    pub fn new(
        store: Arc<CatalogStore>,
        fetcher: Arc<CatalogFetcher>,
        snapshots: Arc<dyn SnapshotStore>,
        window: Duration,
    ) -> Self {
        Self {
            store,
            fetcher,
            snapshots,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Fire a refresh cycle when the catalog is stale. Returns whether
    /// a cycle was started.
    pub fn maybe_refresh(&self, now: DateTime<Utc>) -> bool {
        if !self.store.is_stale(now, self.window) {
            return false;
        }
        self.trigger()
    }

    /// Fire a refresh cycle regardless of staleness, subject only to
    /// the in-flight guard. Returns whether a cycle was started.
    pub fn trigger(&self) -> bool {
        if !self.store.begin_refresh() {
            debug!("Refresh already in flight, not starting another");
            return false;
        }

        let store = Arc::clone(&self.store);
        let fetcher = Arc::clone(&self.fetcher);
        let snapshots = Arc::clone(&self.snapshots);

        tokio::spawn(async move {
            Self::run_cycle(store, fetcher, snapshots).await;
        });

        true
    }

    /// One full fetch cycle. The store is already in the refreshing
    /// state when this runs.
    async fn run_cycle(
        store: Arc<CatalogStore>,
        fetcher: Arc<CatalogFetcher>,
        snapshots: Arc<dyn SnapshotStore>,
    ) {
        let started = Instant::now();

        match fetcher.fetch().await {
            Ok(catalog) => {
                let now = Utc::now();
                metrics::CATALOG_CARDS.set(catalog.len() as i64);

                let snapshot = CacheSnapshot::new(catalog.clone(), now);
                store.complete_refresh(catalog, now);

                if let Err(e) = snapshots.save(&snapshot) {
                    warn!(error = %e, "Failed to persist catalog snapshot");
                }

                metrics::REFRESH_CYCLES.with_label_values(&["success"]).inc();
                metrics::REFRESH_DURATION
                    .with_label_values(&["success"])
                    .observe(started.elapsed().as_secs_f64());
            }
            Err(e) => {
                store.abort_refresh();
                metrics::REFRESH_CYCLES.with_label_values(&["failed"]).inc();
                metrics::REFRESH_DURATION
                    .with_label_values(&["failed"])
                    .observe(started.elapsed().as_secs_f64());
                warn!(error = %e, "Catalog refresh failed");
            }
        }
    }
}
