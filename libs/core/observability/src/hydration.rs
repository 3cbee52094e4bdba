//! Metrics emitted by the search-result hydration pipeline.

use metrics::{counter, histogram};

/// Static recorders for the hydration pipeline
pub struct HydrationMetrics;

impl HydrationMetrics {
    /// Record how a ranked page split between cache hits and misses
    pub fn record_cache_lookup(hits: usize, misses: usize) {
        counter!("catalog_cache_hits_total").increment(hits as u64);
        counter!("catalog_cache_misses_total").increment(misses as u64);
    }

    pub fn record_cache_degraded() {
        counter!("catalog_cache_degraded_total").increment(1);
    }

    pub fn record_cache_read_failure() {
        counter!("catalog_cache_read_failures_total").increment(1);
    }

    pub fn record_cache_write_failure(records: usize) {
        counter!("catalog_cache_write_failures_total").increment(records as u64);
    }

    /// Identifiers the index returned that the store no longer has
    pub fn record_store_dropped(count: usize) {
        if count > 0 {
            counter!("catalog_store_dropped_total").increment(count as u64);
        }
    }

    /// Record one search invocation; `outcome` is `ok`, `rejected` or `failed`
    pub fn record_search(outcome: &'static str, duration_secs: f64) {
        counter!("catalog_searches_total", "outcome" => outcome).increment(1);
        histogram!("catalog_search_duration_seconds", "outcome" => outcome).record(duration_secs);
    }
}
