#![allow(clippy::unwrap_used)]

use std::{future::Future, time::Instant};

use error_stack::ResultExt;
use lazy_static::lazy_static;
use prometheus::{
    self, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec,
    IntCounterVec, TextEncoder,
};

const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

lazy_static! {
    pub static ref GATEWAY_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "GATEWAY_OPERATIONS_TOTAL",
        "Total number of gateway operations started",
        &["operation", "connector"]
    )
    .unwrap();

    pub static ref GATEWAY_OPERATIONS_SUCCESSFUL: IntCounterVec = register_int_counter_vec!(
        "GATEWAY_OPERATIONS_SUCCESSFUL",
        "Total number of gateway operations the processor approved",
        &["operation", "connector"]
    )
    .unwrap();

    pub static ref GATEWAY_OPERATION_LATENCY: HistogramVec = register_histogram_vec!(
        "GATEWAY_OPERATION_LATENCY_SECONDS",
        "Gateway operation latency in seconds, all steps included",
        &["operation", "connector"],
        LATENCY_BUCKETS.to_vec()
    )
    .unwrap();

    pub static ref EXTERNAL_SERVICE_API_CALLS_LATENCY: HistogramVec = register_histogram_vec!(
        "EXTERNAL_SERVICE_API_CALLS_LATENCY_SECONDS",
        "Latency of external service API calls",
        &["method", "connector"],
        LATENCY_BUCKETS.to_vec()
    )
    .unwrap();

    pub static ref EXTERNAL_SERVICE_TOTAL_API_CALLS: IntCounterVec = register_int_counter_vec!(
        "EXTERNAL_SERVICE_TOTAL_API_CALLS",
        "Total number of external service API calls",
        &["method", "connector"]
    )
    .unwrap();

    pub static ref EXTERNAL_SERVICE_API_CALLS_ERRORS: IntCounterVec = register_int_counter_vec!(
        "EXTERNAL_SERVICE_API_CALLS_ERRORS",
        "Total number of errors in external service API calls",
        &["method", "connector", "status_code"]
    )
    .unwrap();
}

/// Wraps one gateway operation with the operation counters and latency histogram.
/// `is_success` decides whether the outcome counts as approved.
pub async fn with_operation_metrics<R, E, F, Fut>(
    operation: &str,
    connector: &str,
    is_success: impl FnOnce(&R) -> bool,
    handler: F,
) -> Result<R, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let start_time = Instant::now();

    GATEWAY_OPERATIONS_TOTAL
        .with_label_values(&[operation, connector])
        .inc();

    let result = handler().await;

    if matches!(&result, Ok(response) if is_success(response)) {
        GATEWAY_OPERATIONS_SUCCESSFUL
            .with_label_values(&[operation, connector])
            .inc();
    }

    GATEWAY_OPERATION_LATENCY
        .with_label_values(&[operation, connector])
        .observe(start_time.elapsed().as_secs_f64());

    result
}

/// Renders every registered metric in the prometheus text format.
pub fn metrics_handler() -> error_stack::Result<String, MetricsError> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .change_context(MetricsError::EncodingError)?;
    String::from_utf8(buffer).change_context(MetricsError::Utf8Error)
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Error encoding metrics")]
    EncodingError,
    #[error("Error converting metrics to utf8")]
    Utf8Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn operation_metrics_are_rendered() {
        let result: Result<bool, ()> =
            with_operation_metrics("verify", "metrics_test", |ok| *ok, || async { Ok(true) })
                .await;
        assert_eq!(result, Ok(true));
        let rendered = metrics_handler().unwrap();
        assert!(rendered.contains("GATEWAY_OPERATIONS_SUCCESSFUL"));
        assert!(rendered.contains("metrics_test"));
    }
}
