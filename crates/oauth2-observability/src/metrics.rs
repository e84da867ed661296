use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use std::time::Duration;

use oauth2_core::OAuth2Error;

/// Storage call counters and latencies, labelled by operation.
#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,
    pub storage_operations_total: IntCounterVec,
    pub storage_operation_duration_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let storage_operations_total = IntCounterVec::new(
            Opts::new(
                "storage_operations_total",
                "Grant storage operations by operation and outcome",
            ),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(storage_operations_total.clone()))?;

        let storage_operation_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "storage_operation_duration_seconds",
                "Grant storage operation latency",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["operation"],
        )?;
        registry.register(Box::new(storage_operation_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            storage_operations_total,
            storage_operation_duration_seconds,
        })
    }

    pub fn observe(&self, operation: &str, outcome: &str, elapsed: Duration) {
        self.storage_operations_total
            .with_label_values(&[operation, outcome])
            .inc();
        self.storage_operation_duration_seconds
            .with_label_values(&[operation])
            .observe(elapsed.as_secs_f64());
    }
}

/// Outcome label: `ok`, `not_found` (an expected miss) or `error`.
pub fn outcome<T>(result: &Result<T, OAuth2Error>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(err) if err.is_not_found() => "not_found",
        Err(_) => "error",
    }
}
