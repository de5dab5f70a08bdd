//! Types for query resolution.

use serde::{Deserialize, Serialize};

use crate::catalog::{ArtVariant, CardEntry};

use super::normalize::normalize;

/// Known release codes, oldest to newest, as the upstream gallery ships
/// them.
pub const DEFAULT_RELEASE_PRIORITY: &[&str] =
    &["APH", "BET", "JAE", "RAZ", "J2", "J2 Damjan", "OP1"];

/// A parsed search request.
#[derive(Debug, Clone)]
pub struct CardQuery {
    /// The phrase as the user typed it.
    pub raw_phrase: String,
    /// Optional set qualifier, matched against variant keys
    /// case-insensitively.
    pub variant_filter: Option<String>,
    /// Normalized search term derived from `raw_phrase`.
    pub term: String,
}

impl CardQuery {
    pub fn new(raw_phrase: impl Into<String>, variant_filter: Option<String>) -> Self {
        let raw_phrase = raw_phrase.into();
        let term = normalize(&raw_phrase);
        Self {
            raw_phrase,
            variant_filter,
            term,
        }
    }
}

/// One resolved card/variant pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMatch {
    pub name: String,
    pub variant_key: String,
    pub art_url: String,
}

/// Release ordering used to pick the default variant when no set
/// qualifier is given: the highest-index code present in the entry
/// wins, else the entry's first variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePriority {
    codes: Vec<String>,
}

impl ReleasePriority {
    pub fn new(codes: Vec<String>) -> Self {
        Self { codes }
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Most recent known release present in the entry, falling back to
    /// the entry's first variant.
    pub fn pick_default<'a>(&self, entry: &'a CardEntry) -> Option<&'a ArtVariant> {
        for code in self.codes.iter().rev() {
            if let Some(variant) = entry.get(code) {
                return Some(variant);
            }
        }
        entry.variants().first()
    }
}

impl Default for ReleasePriority {
    fn default() -> Self {
        Self::new(
            DEFAULT_RELEASE_PRIORITY
                .iter()
                .map(|code| code.to_string())
                .collect(),
        )
    }
}

/// Outcome of resolving a query, classified by match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// Nothing matched.
    NoMatch,
    /// Exactly one card/variant to render.
    Single { card: CardMatch },
    /// Several matches, listed by name for the user to narrow down.
    Listing { names: Vec<String> },
    /// More matches than the listing cap; ask for refinement.
    TooBroad { count: usize },
}

impl Resolution {
    /// Classify accumulated matches against the listing cap.
    pub fn classify(mut matches: Vec<CardMatch>, cap: usize) -> Self {
        match matches.len() {
            0 => Resolution::NoMatch,
            1 => Resolution::Single {
                card: matches.swap_remove(0),
            },
            n if n <= cap => Resolution::Listing {
                names: matches.into_iter().map(|m| m.name).collect(),
            },
            n => Resolution::TooBroad { count: n },
        }
    }

    /// Short label for logs and metrics.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            Resolution::NoMatch => "no_match",
            Resolution::Single { .. } => "single",
            Resolution::Listing { .. } => "listing",
            Resolution::TooBroad { .. } => "too_broad",
        }
    }
}
