//! Remote card API gateway.
//!
//! One request/response JSON exchange per fetch phase. Shape quirks of
//! the upstream payloads (a bare value where a one-element list is
//! expected, JS-style falsy placeholders) are normalized here, at the
//! boundary, so downstream code never special-cases them.

mod http;

pub use http::HttpCardGateway;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the remote card API.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Gateway request timed out")]
    Timeout,

    #[error("Gateway returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),
}

/// Client for the remote card catalog API.
#[async_trait]
pub trait CardGateway: Send + Sync {
    /// The full ordered list of card names.
    async fn card_names(&self) -> Result<Vec<String>, GatewayError>;

    /// Variant keys per card, positionally aligned with `cards`.
    /// `None` means the upstream reported no sets for that card.
    async fn variant_keys(
        &self,
        cards: &[String],
    ) -> Result<Vec<Option<Vec<String>>>, GatewayError>;

    /// Art URL per variant of one card, positionally aligned with
    /// `variants`. `None` means that variant has no artwork.
    async fn art_urls(
        &self,
        card: &str,
        variants: &[String],
    ) -> Result<Vec<Option<String>>, GatewayError>;
}
