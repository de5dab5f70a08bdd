//! Mock card gateway for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::gateway::{CardGateway, GatewayError};

/// A recorded gateway call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    CardNames,
    VariantKeys { cards: Vec<String> },
    ArtUrls { card: String, variants: Vec<String> },
}

#[derive(Debug, Clone)]
struct MockCard {
    name: String,
    /// `None` mirrors a falsy variant-key payload: the card has no sets.
    variants: Option<Vec<(String, Option<String>)>>,
}

/// Mock implementation of the [`CardGateway`] trait.
///
/// Provides controllable behavior for testing:
/// - Canned cards with per-variant art (or gaps)
/// - Error injection, either on the next call or at a specific call
/// - Recorded calls for assertions
/// - An optional per-call delay to hold a fetch cycle in flight
///
/// # Example
///
/// ```rust,ignore
/// use gallerist_core::testing::MockCardGateway;
///
/// let gateway = MockCardGateway::new();
/// gateway.add_card("Barruk", &[("APH", Some("https://a/1.png"))]).await;
///
/// let names = gateway.card_names().await?;
/// assert_eq!(names, vec!["Barruk"]);
/// assert_eq!(gateway.call_count().await, 1);
/// ```
pub struct MockCardGateway {
    /// Canned cards, in upstream order.
    cards: RwLock<Vec<MockCard>>,
    /// Recorded calls.
    calls: RwLock<Vec<RecordedCall>>,
    /// If set, the next call fails with this error (consumed).
    next_error: RwLock<Option<GatewayError>>,
    /// Errors keyed by 1-based call number.
    errors_at: RwLock<HashMap<usize, GatewayError>>,
    /// Delay applied to every call.
    delay: RwLock<Option<Duration>>,
}

impl std::fmt::Debug for MockCardGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCardGateway").finish_non_exhaustive()
    }
}

impl Default for MockCardGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCardGateway {
    /// Create a new mock gateway with no cards.
    pub fn new() -> Self {
        Self {
            cards: RwLock::new(Vec::new()),
            calls: RwLock::new(Vec::new()),
            next_error: RwLock::new(None),
            errors_at: RwLock::new(HashMap::new()),
            delay: RwLock::new(None),
        }
    }

    /// Add a card with its variants. `None` art leaves a gap at that
    /// position, as a falsy upstream entry would.
    pub async fn add_card(&self, name: &str, variants: &[(&str, Option<&str>)]) {
        self.cards.write().await.push(MockCard {
            name: name.to_string(),
            variants: Some(
                variants
                    .iter()
                    .map(|(key, url)| (key.to_string(), url.map(str::to_string)))
                    .collect(),
            ),
        });
    }

    /// Add a card the upstream reports no sets for.
    pub async fn add_setless_card(&self, name: &str) {
        self.cards.write().await.push(MockCard {
            name: name.to_string(),
            variants: None,
        });
    }

    /// Clear all canned cards.
    pub async fn clear_cards(&self) {
        self.cards.write().await.clear();
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: GatewayError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure the nth call (1-based, counted across all phases) to
    /// fail with the given error.
    pub async fn set_error_at_call(&self, call: usize, error: GatewayError) {
        self.errors_at.write().await.insert(call, error);
    }

    /// Delay every call by the given duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Get the number of calls made.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Record a call and surface any injected error for it.
    async fn enter_call(&self, call: RecordedCall) -> Result<(), GatewayError> {
        if let Some(delay) = *self.delay.read().await {
            tokio::time::sleep(delay).await;
        }

        let mut calls = self.calls.write().await;
        calls.push(call);
        let number = calls.len();
        drop(calls);

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if let Some(err) = self.errors_at.write().await.remove(&number) {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl CardGateway for MockCardGateway {
    async fn card_names(&self) -> Result<Vec<String>, GatewayError> {
        self.enter_call(RecordedCall::CardNames).await?;
        Ok(self
            .cards
            .read()
            .await
            .iter()
            .map(|card| card.name.clone())
            .collect())
    }

    async fn variant_keys(
        &self,
        cards: &[String],
    ) -> Result<Vec<Option<Vec<String>>>, GatewayError> {
        self.enter_call(RecordedCall::VariantKeys {
            cards: cards.to_vec(),
        })
        .await?;

        let canned = self.cards.read().await;
        Ok(cards
            .iter()
            .map(|name| {
                canned
                    .iter()
                    .find(|card| &card.name == name)
                    .and_then(|card| card.variants.as_ref())
                    .map(|variants| variants.iter().map(|(key, _)| key.clone()).collect())
            })
            .collect())
    }

    async fn art_urls(
        &self,
        card: &str,
        variants: &[String],
    ) -> Result<Vec<Option<String>>, GatewayError> {
        self.enter_call(RecordedCall::ArtUrls {
            card: card.to_string(),
            variants: variants.to_vec(),
        })
        .await?;

        let canned = self.cards.read().await;
        let known = canned
            .iter()
            .find(|c| c.name == card)
            .and_then(|c| c.variants.clone())
            .unwrap_or_default();

        Ok(variants
            .iter()
            .map(|key| {
                known
                    .iter()
                    .find(|(k, _)| k == key)
                    .and_then(|(_, url)| url.clone())
            })
            .collect())
    }
}
