//! HTTP implementation of the card gateway.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;

use super::{CardGateway, GatewayError};

// Phase codes understood by the upstream API.
const PHASE_CARD_NAMES: u8 = 0;
const PHASE_VARIANT_KEYS: u8 = 2;
const PHASE_ART_URLS: u8 = 4;

#[derive(Debug, Serialize)]
struct RequestEnvelope {
    requests: Vec<PhaseRequest>,
}

#[derive(Debug, Serialize)]
struct PhaseRequest {
    request: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<CardParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    variant: Option<Vec<String>>,
}

/// The variant-key phase sends the whole encoded name list; the art
/// phase sends a single encoded name.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum CardParam {
    Single(String),
    Batch(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    responses: Vec<PhaseResponse>,
}

#[derive(Debug, Deserialize)]
struct PhaseResponse {
    response: Value,
}

/// Gateway over the remote card API's POST endpoint.
pub struct HttpCardGateway {
    client: Client,
    url: String,
}

impl HttpCardGateway {
    /// Create a gateway with the configured endpoint and per-call
    /// timeout.
    pub fn new(config: &ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            url: config.request_url(),
        }
    }

    /// Issue one phase call and unwrap the response envelope.
    async fn exchange(&self, request: PhaseRequest) -> Result<Value, GatewayError> {
        let phase = request.request;
        let body = RequestEnvelope {
            requests: vec![request],
        };

        debug!(phase, url = %self.url, "Issuing gateway request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let mut envelope: ResponseEnvelope = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        if envelope.responses.is_empty() {
            return Err(GatewayError::MalformedResponse(
                "empty responses array".to_string(),
            ));
        }
        Ok(envelope.responses.remove(0).response)
    }
}

#[async_trait]
impl CardGateway for HttpCardGateway {
    async fn card_names(&self) -> Result<Vec<String>, GatewayError> {
        let payload = self
            .exchange(PhaseRequest {
                request: PHASE_CARD_NAMES,
                card: None,
                variant: None,
            })
            .await?;
        parse_card_names(payload)
    }

    async fn variant_keys(
        &self,
        cards: &[String],
    ) -> Result<Vec<Option<Vec<String>>>, GatewayError> {
        let payload = self
            .exchange(PhaseRequest {
                request: PHASE_VARIANT_KEYS,
                card: Some(CardParam::Batch(encode_all(cards))),
                variant: None,
            })
            .await?;
        parse_variant_keys(payload)
    }

    async fn art_urls(
        &self,
        card: &str,
        variants: &[String],
    ) -> Result<Vec<Option<String>>, GatewayError> {
        let payload = self
            .exchange(PhaseRequest {
                request: PHASE_ART_URLS,
                card: Some(CardParam::Single(urlencoding::encode(card).into_owned())),
                variant: Some(encode_all(variants)),
            })
            .await?;
        parse_art_urls(payload)
    }
}

fn encode_all(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| urlencoding::encode(v).into_owned())
        .collect()
}

/// JS-style falsy: the upstream uses `null`/`false`/`""`/`0` (and the
/// occasional empty array) as "nothing here" placeholders.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

fn as_string(value: Value, context: &str) -> Result<String, GatewayError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(GatewayError::MalformedResponse(format!(
            "{context}: expected a string, got {other}"
        ))),
    }
}

/// Name-list payload: an ordered list of strings, nothing else.
fn parse_card_names(payload: Value) -> Result<Vec<String>, GatewayError> {
    let Value::Array(items) = payload else {
        return Err(GatewayError::MalformedResponse(
            "card name list is not an array".to_string(),
        ));
    };
    items
        .into_iter()
        .map(|item| as_string(item, "card name"))
        .collect()
}

/// Variant-key payload: per card, a list of keys or a falsy placeholder.
fn parse_variant_keys(payload: Value) -> Result<Vec<Option<Vec<String>>>, GatewayError> {
    let Value::Array(items) = payload else {
        return Err(GatewayError::MalformedResponse(
            "variant key payload is not an array".to_string(),
        ));
    };
    items
        .into_iter()
        .map(|entry| {
            if is_falsy(&entry) {
                return Ok(None);
            }
            let Value::Array(keys) = entry else {
                return Err(GatewayError::MalformedResponse(
                    "variant key entry is neither falsy nor an array".to_string(),
                ));
            };
            keys.into_iter()
                .map(|key| as_string(key, "variant key"))
                .collect::<Result<Vec<_>, _>>()
                .map(Some)
        })
        .collect()
}

/// Art payload: URL per variant by position. A single-variant card may
/// come back as a bare value; both forms normalize to one `Option` per
/// position.
fn parse_art_urls(payload: Value) -> Result<Vec<Option<String>>, GatewayError> {
    match payload {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                if is_falsy(&item) {
                    Ok(None)
                } else {
                    as_string(item, "art reference").map(Some)
                }
            })
            .collect(),
        bare if is_falsy(&bare) => Ok(vec![None]),
        bare => Ok(vec![Some(as_string(bare, "art reference")?)]),
    }
}
