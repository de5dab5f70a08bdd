//! Card catalog: data model, live store, durable snapshots.
//!
//! The catalog maps card name → release variant → artwork URL. It is
//! rebuilt wholesale by each fetch cycle and read-only in between, so a
//! query never observes a half-written entry.

mod snapshot;
mod store;
mod types;

pub use snapshot::{JsonSnapshotStore, SnapshotError, SnapshotStore};
pub use store::{CatalogStore, Freshness};
pub use types::{ArtVariant, CacheSnapshot, CardEntry, Catalog};
