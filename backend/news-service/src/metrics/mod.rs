//! Prometheus metrics for news-service.
//!
//! Exposes store operation collectors and an HTTP handler for the metrics endpoint.

use crate::error::AppError;
use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::time::Duration;

lazy_static! {
    /// News operations segmented by operation and outcome.
    pub static ref NEWS_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "news_operations_total",
        "Total news operations segmented by operation and outcome",
        &["operation", "outcome"]
    )
    .expect("failed to register news_operations_total");

    /// Duration of document store round trips by operation.
    pub static ref NEWS_STORE_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "news_store_duration_seconds",
        "Document store round trip duration segmented by operation",
        &["operation"]
    )
    .expect("failed to register news_store_duration_seconds");
}

/// Label describing how an operation ended.
pub fn outcome_label<T>(result: &Result<T, AppError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(AppError::Validation(_) | AppError::PayloadTooLarge(_)) => "invalid",
        Err(AppError::NotFound(_)) => "not_found",
        Err(AppError::Timeout(_)) => "timeout",
        Err(AppError::StoreUnavailable(_)) => "unavailable",
        Err(AppError::Store(_) | AppError::Internal(_)) => "error",
    }
}

pub fn record_operation<T>(operation: &str, result: &Result<T, AppError>) {
    NEWS_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome_label(result)])
        .inc();
}

pub fn record_store_duration(operation: &str, elapsed: Duration) {
    NEWS_STORE_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(elapsed.as_secs_f64());
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
