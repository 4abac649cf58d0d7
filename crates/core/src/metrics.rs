//! Prometheus metrics for the resolution pipeline.
//!
//! This module provides metrics for:
//! - Stream requests and their outcomes
//! - Per-candidate resolution attempts and durations
//! - Cache lookups per tier
//! - Availability check failures

use once_cell::sync::Lazy;
use prometheus::{core::Collector, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

/// Stream requests total by content type.
pub static STREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("presto_stream_requests_total", "Total stream requests"),
        &["type"], // "movie", "series"
    )
    .unwrap()
});

/// Per-candidate resolution attempts by result.
pub static CANDIDATE_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "presto_candidate_resolutions_total",
            "Per-candidate resolution attempts",
        ),
        &["result"], // "resolved", "failed"
    )
    .unwrap()
});

/// Per-candidate resolution duration in seconds.
pub static RESOLUTION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "presto_candidate_resolution_duration_seconds",
            "Duration of a single candidate resolution",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["result"],
    )
    .unwrap()
});

/// Cache lookups by tier and outcome.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("presto_cache_lookups_total", "Cache lookups per tier"),
        &["cache", "outcome"], // "metadata"/"search"/"streams", "hit"/"miss"
    )
    .unwrap()
});

/// Bulk availability checks that failed and fell back to original order.
pub static AVAILABILITY_CHECK_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "presto_availability_check_failures_total",
        "Instant availability checks that failed soft",
    )
    .unwrap()
});

/// All pipeline metrics, for registration into a server-side registry.
pub fn all_metrics() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(STREAM_REQUESTS.clone()),
        Box::new(CANDIDATE_RESOLUTIONS.clone()),
        Box::new(RESOLUTION_DURATION.clone()),
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(AVAILABILITY_CHECK_FAILURES.clone()),
    ]
}
