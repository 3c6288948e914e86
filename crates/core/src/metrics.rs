//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Conversion worker (per-file conversions and their duration)
//! - Batch orchestrator (batches by result, batch sizes)
//! - Output packager (archives built)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Conversion Worker Metrics
// =============================================================================

/// Per-file conversions total by result.
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("convertino_conversions_total", "Total file conversions"),
        &["result"], // "success", "failed", "timeout", "not_found", "io_error"
    )
    .unwrap()
});

/// Conversion duration in seconds.
pub static CONVERSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "convertino_conversion_duration_seconds",
            "Duration of single file conversions",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Batch Metrics
// =============================================================================

/// Batches total by result.
pub static BATCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("convertino_batches_total", "Total conversion batches"),
        &["result"], // "completed", "partial", "failed", "rejected"
    )
    .unwrap()
});

/// Files per accepted batch.
pub static BATCH_FILES: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "convertino_batch_files",
            "Number of files in accepted batches",
        )
        .buckets(vec![1.0, 2.0, 3.0, 4.0, 5.0, 10.0, 20.0]),
        &[],
    )
    .unwrap()
});

/// Zip archives built for multi-file results.
pub static ARCHIVES_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "convertino_archives_created_total",
        "Total zip archives built",
    )
    .unwrap()
});

/// Returns all core metrics for registration with a Prometheus registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Worker
        Box::new(CONVERSIONS_TOTAL.clone()),
        Box::new(CONVERSION_DURATION.clone()),
        // Batches
        Box::new(BATCHES_TOTAL.clone()),
        Box::new(BATCH_FILES.clone()),
        Box::new(ARCHIVES_CREATED.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_register_cleanly() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }

        CONVERSIONS_TOTAL.with_label_values(&["success"]).inc();
        let names: Vec<_> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"convertino_conversions_total".to_string()));
    }
}
