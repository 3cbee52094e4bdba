//! Metrics for the catalog search service.
//!
//! - Prometheus recorder and `/metrics` rendering
//! - HTTP request metrics middleware
//! - [`HydrationMetrics`] for the search-result hydration pipeline
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, middleware::metrics_middleware};
//!
//! init_metrics()?;
//!
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler))
//!     .layer(axum::middleware::from_fn(metrics_middleware));
//! ```

pub mod hydration;
pub mod middleware;

pub use hydration::HydrationMetrics;

pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder.
///
/// Idempotent: later calls return the handle installed by the first one.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for `GET /metrics`
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP responses with a 4xx or 5xx status"
    );

    describe_counter!(
        "catalog_searches_total",
        "Search invocations by outcome (ok, rejected, failed)"
    );
    describe_histogram!(
        "catalog_search_duration_seconds",
        "End-to-end search duration including hydration"
    );
    describe_counter!(
        "catalog_cache_hits_total",
        "Identifiers served from the cache"
    );
    describe_counter!(
        "catalog_cache_misses_total",
        "Identifiers fetched from the store after a cache miss"
    );
    describe_counter!(
        "catalog_cache_degraded_total",
        "Cache values returned raw because they did not parse as a variant"
    );
    describe_counter!(
        "catalog_cache_read_failures_total",
        "Cache reads that failed and fell back to the store"
    );
    describe_counter!(
        "catalog_cache_write_failures_total",
        "Records whose cache write-back failed"
    );
    describe_counter!(
        "catalog_store_dropped_total",
        "Ranked identifiers found in neither the cache nor the store"
    );
}
