//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Existence probes (outcomes, batch sizes and durations)
//! - Scan cache (lookups, scans)
//! - Print documents

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Probes
// =============================================================================

/// Individual probes by result.
pub static PROBES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("qbank_probes_total", "Total asset existence probes"),
        &["result"], // "found", "not_found", "timeout", "error", "rejected"
    )
    .unwrap()
});

/// Wall time of a whole probe batch.
pub static PROBE_BATCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "qbank_probe_batch_duration_seconds",
            "Duration of a probe batch until every probe settled",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["backend"],
    )
    .unwrap()
});

/// Locators per probe batch.
pub static PROBE_BATCH_SIZE: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("qbank_probe_batch_size", "Number of locators per probe batch")
            .buckets(vec![1.0, 10.0, 30.0, 60.0, 180.0, 360.0, 1000.0]),
    )
    .unwrap()
});

// =============================================================================
// Scan cache
// =============================================================================

/// Cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("qbank_cache_lookups_total", "Scan cache lookups"),
        &["result"], // "hit", "miss", "expired"
    )
    .unwrap()
});

/// Load requests by what they ended up doing.
pub static SCANS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("qbank_scans_total", "Catalog loads by outcome"),
        &["outcome"], // "scanned", "already_scanned", "revalidated", "from_cache", "selection_required"
    )
    .unwrap()
});

// =============================================================================
// Print
// =============================================================================

/// Print requests by result.
pub static PRINT_DOCUMENTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("qbank_print_documents_total", "Print document requests"),
        &["result"], // "ok", "selection_empty", "no_print_type", "target_unavailable"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(PROBES_TOTAL.clone()),
        Box::new(PROBE_BATCH_DURATION.clone()),
        Box::new(PROBE_BATCH_SIZE.clone()),
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(SCANS_TOTAL.clone()),
        Box::new(PRINT_DOCUMENTS.clone()),
    ]
}
