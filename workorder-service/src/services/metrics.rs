//! Prometheus metrics for workorder-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec,
    HistogramVec, TextEncoder,
};

/// Estimate counter by status.
pub static ESTIMATES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "workorder_estimates_total",
        "Total number of estimates by status",
        &["status"] // draft, sent, approved, rejected, expired
    )
    .expect("Failed to register estimates_total")
});

/// Work order counter by job status.
pub static WORK_ORDERS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "workorder_work_orders_total",
        "Total number of work orders by job status",
        &["status"]
    )
    .expect("Failed to register work_orders_total")
});

/// Final statements generated.
pub static STATEMENTS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "workorder_statements_total",
        "Total number of final statements generated"
    )
    .expect("Failed to register statements_total")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "workorder_errors_total",
        "Total number of errors by type",
        &["error_type"]
    )
    .expect("Failed to register errors_total")
});

/// Store operation duration histogram.
pub static STORE_OP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "workorder_store_op_duration_seconds",
        "Store operation duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register store_op_duration")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&ESTIMATES_TOTAL);
    Lazy::force(&WORK_ORDERS_TOTAL);
    Lazy::force(&STATEMENTS_TOTAL);
    Lazy::force(&ERRORS_TOTAL);
    Lazy::force(&STORE_OP_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
