//! Types for the card artwork catalog.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// One printed release of a card: the variant key (a set code, possibly
/// with a sub-label, e.g. "APH" or "J2 Damjan") and its artwork URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtVariant {
    pub key: String,
    pub url: String,
}

/// All known releases of a single card, in the order the upstream API
/// returned them.
///
/// Serialized as a JSON object mapping variant key to URL; the custom
/// serde below keeps entry order so a snapshot round-trips byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardEntry {
    variants: Vec<ArtVariant>,
}

impl CardEntry {
    pub fn new(variants: Vec<ArtVariant>) -> Self {
        Self { variants }
    }

    /// Append a variant. Keys are unique upstream; duplicates are not
    /// checked here.
    pub fn push(&mut self, key: impl Into<String>, url: impl Into<String>) {
        self.variants.push(ArtVariant {
            key: key.into(),
            url: url.into(),
        });
    }

    pub fn variants(&self) -> &[ArtVariant] {
        &self.variants
    }

    /// Look up a variant by exact key.
    pub fn get(&self, key: &str) -> Option<&ArtVariant> {
        self.variants.iter().find(|v| v.key == key)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl Serialize for CardEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.variants.len()))?;
        for variant in &self.variants {
            map.serialize_entry(&variant.key, &variant.url)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CardEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = CardEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of variant key to art URL")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut variants = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, url)) = access.next_entry::<String, String>()? {
                    variants.push(ArtVariant { key, url });
                }
                Ok(CardEntry { variants })
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}

/// The full card-name → releases mapping.
///
/// Rebuilt wholesale by each successful fetch cycle and read-only in
/// between. The sorted map keeps snapshot bytes deterministic; card
/// order carries no ranking meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    cards: BTreeMap<String, CardEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: CardEntry) {
        self.cards.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&CardEntry> {
        self.cards.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CardEntry)> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The persisted cache document:
/// `{"lastUpdate": <epoch millis>, "cardCache": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    #[serde(rename = "lastUpdate")]
    pub last_update: i64,
    #[serde(rename = "cardCache")]
    pub card_cache: Catalog,
}

impl CacheSnapshot {
    pub fn new(catalog: Catalog, stamped_at: DateTime<Utc>) -> Self {
        Self {
            last_update: stamped_at.timestamp_millis(),
            card_cache: catalog,
        }
    }

    /// The stamp as a timestamp, `None` when the persisted millis are
    /// out of the representable range.
    pub fn stamped_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.last_update).single()
    }
}
