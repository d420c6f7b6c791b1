//! Prometheus metrics for the feed service.
//!
//! Exposes request-level and engine-level collectors and an HTTP handler for
//! the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Total HTTP requests by method, matched route pattern, and status.
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests segmented by method, route, and status",
        &["method", "route", "status"]
    )
    .expect("failed to register http_requests_total");

    /// Request duration by method and matched route pattern.
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration segmented by method and route",
        &["method", "route"]
    )
    .expect("failed to register http_request_duration_seconds");

    /// Feed listings served, segmented by filter variant.
    pub static ref FEED_QUERIES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_queries_total",
        "Feed listings served segmented by filter variant",
        &["filter"]
    )
    .expect("failed to register feed_queries_total");

    /// Reaction toggles by kind (like/dislike/bookmark) and direction.
    pub static ref REACTION_TOGGLES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "reaction_toggles_total",
        "Reaction toggles segmented by kind and direction",
        &["kind", "action"]
    )
    .expect("failed to register reaction_toggles_total");
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
