//! Free-text query resolution over the card catalog.
//!
//! Matching is plain substring containment on normalized names. An
//! explicit set qualifier narrows each card to the first variant whose
//! key contains it; otherwise the release priority picks the default.
//! A candidate whose normalized name equals the search term collapses
//! the whole result to that single card.

mod normalize;
mod types;

pub use normalize::normalize;
pub use types::{CardMatch, CardQuery, ReleasePriority, Resolution, DEFAULT_RELEASE_PRIORITY};

use crate::catalog::{CardEntry, Catalog};

pub struct QueryResolver {
    priority: ReleasePriority,
}

impl QueryResolver {
    pub fn new(priority: ReleasePriority) -> Self {
        Self { priority }
    }

    /// Scan the catalog and accumulate one card/variant pair per
    /// matching card. The first exact name hit discards everything
    /// accumulated so far and ends the scan.
    pub fn resolve(&self, catalog: &Catalog, query: &CardQuery) -> Vec<CardMatch> {
        let mut matches = Vec::new();

        for (name, entry) in catalog.iter() {
            let normalized_name = normalize(name);
            if !normalized_name.contains(&query.term) {
                continue;
            }

            let Some(m) = self.match_for(name, entry, query) else {
                continue;
            };

            if normalized_name == query.term {
                return vec![m];
            }
            matches.push(m);
        }

        matches
    }

    /// Pick the variant for one matching card, or `None` when an
    /// explicit filter excludes every variant.
    fn match_for(&self, name: &str, entry: &CardEntry, query: &CardQuery) -> Option<CardMatch> {
        let variant = match &query.variant_filter {
            Some(filter) => {
                let needle = filter.to_uppercase();
                entry
                    .variants()
                    .iter()
                    .find(|v| v.key.to_uppercase().contains(&needle))?
            }
            None => self.priority.pick_default(entry)?,
        };

        Some(CardMatch {
            name: name.to_string(),
            variant_key: variant.key.clone(),
            art_url: variant.url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pairs: &[(&str, &str)]) -> CardEntry {
        let mut entry = CardEntry::default();
        for (key, url) in pairs {
            entry.push(*key, *url);
        }
        entry
    }

    fn resolver() -> QueryResolver {
        QueryResolver::new(ReleasePriority::default())
    }

    fn barruk_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert("Barruk", entry(&[("APH", "u-aph"), ("OP1", "u-op1")]));
        catalog
    }

    #[test]
    fn test_unfiltered_picks_priority_default() {
        let matches = resolver().resolve(&barruk_catalog(), &CardQuery::new("barruk", None));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Barruk");
        assert_eq!(matches[0].variant_key, "OP1");
        assert_eq!(matches[0].art_url, "u-op1");
    }

    #[test]
    fn test_unfiltered_custom_priority_order() {
        let resolver = QueryResolver::new(ReleasePriority::new(vec![
            "APH".to_string(),
            "KORG".to_string(),
        ]));
        let mut catalog = Catalog::new();
        catalog.insert("Barruk", entry(&[("APH", "u1"), ("KORG", "u2")]));

        let matches = resolver.resolve(&catalog, &CardQuery::new("Barruk", None));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].variant_key, "KORG");
    }

    #[test]
    fn test_filtered_picks_first_containing_variant() {
        let matches = resolver().resolve(
            &barruk_catalog(),
            &CardQuery::new("Barruk", Some("aph".to_string())),
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].variant_key, "APH");
    }

    #[test]
    fn test_filtered_takes_first_hit_in_entry_order() {
        let mut catalog = Catalog::new();
        catalog.insert(
            "Barruk",
            entry(&[("J2", "u1"), ("J2 Damjan", "u2"), ("OP1", "u3")]),
        );

        let matches = resolver().resolve(
            &catalog,
            &CardQuery::new("barruk", Some("j2".to_string())),
        );
        // One pair per card in filtered mode, the first containing key.
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].variant_key, "J2");
    }

    #[test]
    fn test_filter_excluding_all_variants_drops_card() {
        let matches = resolver().resolve(
            &barruk_catalog(),
            &CardQuery::new("barruk", Some("ZZZ".to_string())),
        );
        assert!(matches.is_empty());
    }

    #[test]
    fn test_substring_containment_matches_partial_names() {
        let mut catalog = Catalog::new();
        catalog.insert("Barruk", entry(&[("APH", "u1")]));
        catalog.insert("Barruk the Bold", entry(&[("BET", "u2")]));
        catalog.insert("Vex", entry(&[("OP1", "u3")]));

        let matches = resolver().resolve(&catalog, &CardQuery::new("the bold", None));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Barruk the Bold");
    }

    #[test]
    fn test_exact_match_collapses_substring_matches() {
        let mut catalog = Catalog::new();
        catalog.insert("Bar", entry(&[("APH", "u1")]));
        catalog.insert("Barruk", entry(&[("APH", "u2")]));

        let matches = resolver().resolve(&catalog, &CardQuery::new("Bar", None));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Bar");
    }

    #[test]
    fn test_exact_match_collapse_applies_with_filter() {
        let mut catalog = Catalog::new();
        catalog.insert("Bar", entry(&[("APH", "u1"), ("OP1", "u2")]));
        catalog.insert("Barruk", entry(&[("APH", "u3")]));

        let matches = resolver().resolve(
            &catalog,
            &CardQuery::new("bar", Some("aph".to_string())),
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Bar");
        assert_eq!(matches[0].variant_key, "APH");
    }

    #[test]
    fn test_exact_name_without_filtered_variant_does_not_collapse() {
        let mut catalog = Catalog::new();
        catalog.insert("Bar", entry(&[("OP1", "u1")]));
        catalog.insert("Barruk", entry(&[("APH", "u2")]));

        // "Bar" matches the term exactly but has no APH variant, so it
        // contributes nothing; "Barruk" still matches.
        let matches = resolver().resolve(
            &catalog,
            &CardQuery::new("bar", Some("aph".to_string())),
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Barruk");
    }

    #[test]
    fn test_accent_and_quote_insensitive_matching() {
        let mut catalog = Catalog::new();
        catalog.insert("José\u{2019}s Card", entry(&[("APH", "u1")]));

        for phrase in ["jose's card", "JOSÉ'S CARD", "José\u{2019}s Card"] {
            let matches = resolver().resolve(&catalog, &CardQuery::new(phrase, None));
            assert_eq!(matches.len(), 1, "phrase {phrase:?} should match");
            assert_eq!(matches[0].name, "José\u{2019}s Card");
        }
    }

    #[test]
    fn test_filter_only_query_matches_every_card_with_variant() {
        let mut catalog = Catalog::new();
        catalog.insert("Barruk", entry(&[("APH", "u1")]));
        catalog.insert("Vex", entry(&[("OP1", "u2")]));
        catalog.insert("Korg", entry(&[("APH", "u3"), ("OP1", "u4")]));

        let matches = resolver().resolve(
            &catalog,
            &CardQuery::new("", Some("aph".to_string())),
        );
        let names: Vec<&str> = matches.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Barruk", "Korg"]);
    }

    #[test]
    fn test_empty_catalog_yields_no_matches() {
        let matches = resolver().resolve(&Catalog::new(), &CardQuery::new("barruk", None));
        assert!(matches.is_empty());
    }

    #[test]
    fn test_no_match_for_unknown_term() {
        let matches = resolver().resolve(&barruk_catalog(), &CardQuery::new("zzz", None));
        assert!(matches.is_empty());
    }
}
