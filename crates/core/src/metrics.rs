//! Prometheus metrics for the catalog engine.
//!
//! This module provides metrics for:
//! - Refresh cycles (count by result, duration)
//! - Catalog size
//! - Query resolution outcomes

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry};

/// Refresh cycles total by result.
pub static REFRESH_CYCLES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gallerist_refresh_cycles_total",
            "Total catalog refresh cycles",
        ),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Refresh cycle duration in seconds.
pub static REFRESH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "gallerist_refresh_duration_seconds",
            "Duration of catalog refresh cycles",
        )
        .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
        &["result"],
    )
    .unwrap()
});

/// Cards in the live catalog after the last successful refresh.
pub static CATALOG_CARDS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("gallerist_catalog_cards", "Cards in the live catalog").unwrap()
});

/// Resolved queries total by outcome.
pub static QUERIES_RESOLVED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("gallerist_queries_resolved_total", "Total queries resolved"),
        &["outcome"], // "no_match", "single", "listing", "too_broad"
    )
    .unwrap()
});

/// Register all engine metrics with the given registry.
pub fn register(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(REFRESH_CYCLES.clone()))?;
    registry.register(Box::new(REFRESH_DURATION.clone()))?;
    registry.register(Box::new(CATALOG_CARDS.clone()))?;
    registry.register(Box::new(QUERIES_RESOLVED.clone()))?;
    Ok(())
}
