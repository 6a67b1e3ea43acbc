//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the question bank server:
//! - HTTP request metrics (latency, counts)
//! - Session size (collected dynamically)
//! - Core probe, cache and print metrics (registered from the core crate)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use qbank_core::{MARK_SCHEMES_FOLDER, QUESTIONS_FOLDER};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "qbank_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("qbank_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "qbank_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Session Metrics (collected dynamically)
// =============================================================================

/// Questions discovered so far.
pub static CATALOG_ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("qbank_catalog_items", "Number of questions in the catalog").unwrap()
});

/// Selected question paths.
pub static SELECTED_ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("qbank_selected_items", "Number of selected questions").unwrap()
});

/// Live scan cache entries.
pub static CACHE_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("qbank_cache_entries", "Number of scan cache entries").unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Session
    registry.register(Box::new(CATALOG_ITEMS.clone())).unwrap();
    registry.register(Box::new(SELECTED_ITEMS.clone())).unwrap();
    registry.register(Box::new(CACHE_ENTRIES.clone())).unwrap();

    // Core metrics (probes, scan cache, print)
    for metric in qbank_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Update session gauges from the current application state.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let session = state.session().lock().await;
    let stats = session.stats();
    CATALOG_ITEMS.set(stats.total_items as i64);
    SELECTED_ITEMS.set(stats.selected_items as i64);
    CACHE_ENTRIES.set(stats.cache.entries as i64);
}

/// Normalize a path for metric labels.
///
/// Asset requests collapse to their top folder and every other static
/// path to `/{static}`, so only API routes keep their own label value.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with("/api/") {
        return path.to_string();
    }
    for folder in [QUESTIONS_FOLDER, MARK_SCHEMES_FOLDER] {
        let prefix = format!("/{}/", folder);
        if path.starts_with(&prefix) {
            return format!("/{}/{{asset}}", folder);
        }
    }
    "/{static}".to_string()
}
