//! Testing utilities and mock implementations.
//!
//! This module provides test doubles for the engine's external
//! collaborators (the remote card gateway and the snapshot file) so
//! fetch and refresh behavior can be tested without real
//! infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use gallerist_core::testing::{MockCardGateway, MemorySnapshotStore};
//!
//! let gateway = MockCardGateway::new();
//! gateway.add_card("Barruk", &[("APH", Some("https://a/1.png"))]).await;
//!
//! let snapshots = MemorySnapshotStore::new();
//! // Use in GalleryService::new(...)
//! ```

mod memory_snapshot;
mod mock_gateway;

pub use memory_snapshot::MemorySnapshotStore;
pub use mock_gateway::{MockCardGateway, RecordedCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{CardEntry, Catalog};

    /// Create a catalog entry from (variant key, art URL) pairs.
    pub fn entry(variants: &[(&str, &str)]) -> CardEntry {
        let mut entry = CardEntry::default();
        for (key, url) in variants {
            entry.push(*key, *url);
        }
        entry
    }

    /// Create a catalog from (card name, variants) pairs.
    pub fn catalog(cards: &[(&str, &[(&str, &str)])]) -> Catalog {
        let mut catalog = Catalog::new();
        for (name, variants) in cards {
            catalog.insert(*name, entry(variants));
        }
        catalog
    }
}
