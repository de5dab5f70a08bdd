//! Query resolution integration tests.
//!
//! These tests fetch a catalog through the mock gateway and exercise
//! the full resolve surface: default-variant selection, set filters,
//! the exact-match collapse, normalization, and the cardinality tiers.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use gallerist_core::testing::{MemorySnapshotStore, MockCardGateway};
use gallerist_core::{
    ApiConfig, CacheConfig, CardGateway, Config, GalleryService, Resolution, ResolverConfig,
    SnapshotStore,
};

fn config(release_priority: &[&str]) -> Config {
    Config {
        api: ApiConfig {
            gateway: "https://cards.example.org".to_string(),
            endpoint: "/api/catalog".to_string(),
            timeout_secs: 5,
        },
        cache: CacheConfig {
            path: "unused.json".into(),
            refresh_secs: 3600,
        },
        resolver: ResolverConfig {
            max_listing: 20,
            release_priority: release_priority.iter().map(|c| c.to_string()).collect(),
        },
    }
}

/// Build a service over the gateway's canned cards and run one fetch
/// cycle so queries have a catalog to read.
async fn service_with_catalog(gateway: MockCardGateway, release_priority: &[&str]) -> GalleryService {
    let service = GalleryService::new(
        &config(release_priority),
        Arc::new(gateway) as Arc<dyn CardGateway>,
        Arc::new(MemorySnapshotStore::new()) as Arc<dyn SnapshotStore>,
    );

    assert!(service.refresh(true));
    for _ in 0..400 {
        if !service.is_refreshing() {
            return service;
        }
        tokio::time::sleep(StdDuration::from_millis(5)).await;
    }
    panic!("fetch cycle did not finish in time");
}

async fn barruk_gateway() -> MockCardGateway {
    let gateway = MockCardGateway::new();
    gateway
        .add_card(
            "Barruk",
            &[
                ("APH", Some("https://a/barruk-aph.png")),
                ("KORG", Some("https://a/barruk-korg.png")),
            ],
        )
        .await;
    gateway
}

#[tokio::test]
async fn test_unfiltered_query_picks_most_recent_release() {
    let service = service_with_catalog(barruk_gateway().await, &["APH", "KORG"]).await;

    match service.resolve("Barruk", None) {
        Resolution::Single { card } => {
            assert_eq!(card.name, "Barruk");
            assert_eq!(card.variant_key, "KORG");
            assert_eq!(card.art_url, "https://a/barruk-korg.png");
        }
        other => panic!("expected Single, got {other:?}"),
    }
}

#[tokio::test]
async fn test_filtered_query_picks_matching_set() {
    let service = service_with_catalog(barruk_gateway().await, &["APH", "KORG"]).await;

    match service.resolve("Barruk", Some("aph")) {
        Resolution::Single { card } => {
            assert_eq!(card.variant_key, "APH");
            assert_eq!(card.art_url, "https://a/barruk-aph.png");
        }
        other => panic!("expected Single, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_set_filter_yields_no_match() {
    let service = service_with_catalog(barruk_gateway().await, &["APH", "KORG"]).await;
    assert!(matches!(
        service.resolve("Barruk", Some("ZZZ")),
        Resolution::NoMatch
    ));
}

#[tokio::test]
async fn test_exact_name_collapses_to_single_match() {
    let gateway = MockCardGateway::new();
    gateway
        .add_card("Bar", &[("APH", Some("https://a/bar.png"))])
        .await;
    gateway
        .add_card("Barruk", &[("APH", Some("https://a/barruk.png"))])
        .await;
    let service = service_with_catalog(gateway, &["APH"]).await;

    match service.resolve("Bar", None) {
        Resolution::Single { card } => assert_eq!(card.name, "Bar"),
        other => panic!("expected Single, got {other:?}"),
    }
}

#[tokio::test]
async fn test_no_match_outcome() {
    let service = service_with_catalog(barruk_gateway().await, &["APH", "KORG"]).await;
    assert!(matches!(
        service.resolve("no such card", None),
        Resolution::NoMatch
    ));
}

#[tokio::test]
async fn test_listing_outcome_names_all_matches() {
    let gateway = MockCardGateway::new();
    for i in 1..=3 {
        gateway
            .add_card(
                &format!("Soldier {i:02}"),
                &[("APH", Some("https://a/s.png"))],
            )
            .await;
    }
    let service = service_with_catalog(gateway, &["APH"]).await;

    match service.resolve("soldier", None) {
        Resolution::Listing { names } => {
            assert_eq!(names, vec!["Soldier 01", "Soldier 02", "Soldier 03"]);
        }
        other => panic!("expected Listing, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cardinality_boundary_at_listing_cap() {
    let gateway = MockCardGateway::new();
    for i in 1..=20 {
        gateway
            .add_card(
                &format!("Soldier {i:02}"),
                &[("APH", Some("https://a/s.png"))],
            )
            .await;
    }
    let service = service_with_catalog(gateway, &["APH"]).await;

    match service.resolve("soldier", None) {
        Resolution::Listing { names } => assert_eq!(names.len(), 20),
        other => panic!("expected Listing, got {other:?}"),
    }
}

#[tokio::test]
async fn test_too_broad_outcome_above_listing_cap() {
    let gateway = MockCardGateway::new();
    for i in 1..=21 {
        gateway
            .add_card(
                &format!("Soldier {i:02}"),
                &[("APH", Some("https://a/s.png"))],
            )
            .await;
    }
    let service = service_with_catalog(gateway, &["APH"]).await;

    assert_eq!(
        service.resolve("soldier", None),
        Resolution::TooBroad { count: 21 }
    );
}

#[tokio::test]
async fn test_accent_and_quote_folding_matches_end_to_end() {
    let gateway = MockCardGateway::new();
    gateway
        .add_card(
            "José\u{2019}s Card",
            &[("APH", Some("https://a/jose.png"))],
        )
        .await;
    let service = service_with_catalog(gateway, &["APH"]).await;

    for phrase in ["jose's card", "JOSÉ'S CARD"] {
        match service.resolve(phrase, None) {
            Resolution::Single { card } => assert_eq!(card.name, "José\u{2019}s Card"),
            other => panic!("phrase {phrase:?}: expected Single, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_filter_only_query_lists_cards_carrying_the_set() {
    let gateway = MockCardGateway::new();
    gateway
        .add_card("Barruk", &[("APH", Some("https://a/1.png"))])
        .await;
    gateway
        .add_card("Vex", &[("OP1", Some("https://a/2.png"))])
        .await;
    gateway
        .add_card(
            "Korg",
            &[("APH", Some("https://a/3.png")), ("OP1", Some("https://a/4.png"))],
        )
        .await;
    let service = service_with_catalog(gateway, &["APH", "OP1"]).await;

    match service.resolve("", Some("aph")) {
        Resolution::Listing { names } => assert_eq!(names, vec!["Barruk", "Korg"]),
        other => panic!("expected Listing, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_catalog_resolves_to_no_match() {
    let service = GalleryService::new(
        &config(&["APH"]),
        Arc::new(MockCardGateway::new()) as Arc<dyn CardGateway>,
        Arc::new(MemorySnapshotStore::new()) as Arc<dyn SnapshotStore>,
    );
    assert!(matches!(
        service.resolve("barruk", None),
        Resolution::NoMatch
    ));
}
