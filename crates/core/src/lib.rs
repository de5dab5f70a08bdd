pub mod catalog;
pub mod config;
pub mod fetcher;
pub mod gateway;
pub mod metrics;
pub mod resolver;
pub mod scheduler;
pub mod service;
pub mod testing;

pub use catalog::{
    ArtVariant, CacheSnapshot, Catalog, CatalogStore, CardEntry, Freshness, JsonSnapshotStore,
    SnapshotError, SnapshotStore,
};
pub use config::{
    load_config, load_config_from_str, validate_config, ApiConfig, CacheConfig, Config,
    ConfigError, ResolverConfig,
};
pub use fetcher::CatalogFetcher;
pub use gateway::{CardGateway, GatewayError, HttpCardGateway};
pub use resolver::{CardMatch, CardQuery, QueryResolver, ReleasePriority, Resolution};
pub use scheduler::RefreshScheduler;
pub use service::GalleryService;
