//! Cascading catalog fetch.
//!
//! Three sequential phases build a fresh [`Catalog`]: the full card-name
//! list, the variant keys per card (one batched call), and the art URL
//! per variant (one call per card). Any gateway failure aborts the whole
//! cycle and the caller keeps whatever catalog was live before; cards
//! the upstream reports nothing usable for are simply absent from the
//! result, never carried over from a prior catalog.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::catalog::{CardEntry, Catalog};
use crate::gateway::{CardGateway, GatewayError};

pub struct CatalogFetcher {
    gateway: Arc<dyn CardGateway>,
}

impl CatalogFetcher {
    pub fn new(gateway: Arc<dyn CardGateway>) -> Self {
        Self { gateway }
    }

    /// Run one full fetch cycle and assemble a fresh catalog.
    pub async fn fetch(&self) -> Result<Catalog, GatewayError> {
        let started = Instant::now();

        debug!("Fetching card name list");
        let names = self.gateway.card_names().await?;

        debug!(cards = names.len(), "Fetching variant key lists");
        let key_lists = self.gateway.variant_keys(&names).await?;

        let mut catalog = Catalog::new();
        let total = names.len();

        // Positional alignment; a key list missing from a short
        // response means that card is skipped, same as a falsy entry.
        for (idx, (name, keys)) in names.iter().zip(key_lists).enumerate() {
            let Some(keys) = keys else { continue };
            if keys.is_empty() {
                continue;
            }

            debug!(card = %name, n = idx + 1, total, "Fetching art list");
            let urls = self.gateway.art_urls(name, &keys).await?;

            let mut entry = CardEntry::default();
            for (key, url) in keys.into_iter().zip(urls) {
                if let Some(url) = url {
                    entry.push(key, url);
                }
            }

            if !entry.is_empty() {
                catalog.insert(name.clone(), entry);
            }
        }

        info!(
            cards = catalog.len(),
            elapsed_secs = started.elapsed().as_secs(),
            "Card catalog rebuilt"
        );

        Ok(catalog)
    }
}
