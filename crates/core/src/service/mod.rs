//! The engine surface consumed by the chat-command layer.
//!
//! Three calls cover everything that layer needs: `resolve` a search
//! phrase, `refresh` the catalog (staleness-driven or manual), and ask
//! whether the catalog `is_stale`. Raw gateway and cache errors never
//! escape this surface; a failed refresh shows up only as an unchanged,
//! still-stale catalog and a warn log.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog::{CatalogStore, SnapshotStore};
use crate::config::Config;
use crate::fetcher::CatalogFetcher;
use crate::gateway::CardGateway;
use crate::metrics;
use crate::resolver::{CardQuery, QueryResolver, ReleasePriority, Resolution};
use crate::scheduler::RefreshScheduler;

pub struct GalleryService {
    store: Arc<CatalogStore>,
    scheduler: RefreshScheduler,
    resolver: QueryResolver,
    max_listing: usize,
}

impl GalleryService {
    /// Wire the engine together, seeding the store from a persisted
    /// snapshot when one is present and well-formed. A missing or
    /// unreadable snapshot just leaves the store stale; the first
    /// `maybe_refresh` repairs it.
    pub fn new(
        config: &Config,
        gateway: Arc<dyn CardGateway>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Self {
        let store = Arc::new(CatalogStore::new());

        if let Some(snapshot) = snapshots.load() {
            info!(cards = snapshot.card_cache.len(), "Loaded catalog snapshot");
            store.seed(snapshot);
        }

        let fetcher = Arc::new(CatalogFetcher::new(gateway));
        let scheduler = RefreshScheduler::new(
            Arc::clone(&store),
            fetcher,
            snapshots,
            Duration::seconds(config.cache.refresh_secs as i64),
        );
        let resolver = QueryResolver::new(ReleasePriority::new(
            config.resolver.release_priority.clone(),
        ));

        Self {
            store,
            scheduler,
            resolver,
            max_listing: config.resolver.max_listing,
        }
    }

    /// Resolve a search phrase plus optional set qualifier against the
    /// live catalog, then kick a background refresh if it has gone
    /// stale. Must be called from within a tokio runtime.
    pub fn resolve(&self, raw_phrase: &str, variant_filter: Option<&str>) -> Resolution {
        let query = CardQuery::new(raw_phrase, variant_filter.map(str::to_string));
        let catalog = self.store.catalog();
        let matches = self.resolver.resolve(&catalog, &query);
        let resolution = Resolution::classify(matches, self.max_listing);

        metrics::QUERIES_RESOLVED
            .with_label_values(&[resolution.outcome_label()])
            .inc();
        debug!(
            phrase = raw_phrase,
            filter = ?query.variant_filter,
            outcome = resolution.outcome_label(),
            "Query resolved"
        );

        self.scheduler.maybe_refresh(Utc::now());

        resolution
    }

    /// Start a refresh cycle. `manual` is the administrative trigger:
    /// it bypasses the staleness check, but both paths respect the
    /// in-flight guard. Returns whether a cycle actually started.
    pub fn refresh(&self, manual: bool) -> bool {
        if manual {
            self.scheduler.trigger()
        } else {
            self.scheduler.maybe_refresh(Utc::now())
        }
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.store.is_stale(now, self.scheduler.window())
    }

    /// True while a fetch cycle is in flight; callers may warn that
    /// results could be incomplete.
    pub fn is_refreshing(&self) -> bool {
        self.store.is_refreshing()
    }
}
