use once_cell::sync::Lazy;
use prometheus::{register_histogram, register_int_counter_vec, Encoder, Histogram, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "portal_client_requests_total",
        "Backend requests issued by the portal client",
        &["method", "outcome"]
    )
    .expect("register requests_total")
});

pub static REQUEST_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "portal_client_request_duration_seconds",
        "Backend request duration in seconds",
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("register request_duration")
});

/// `outcome` is `ok`, `status` (non-2xx) or `network`.
pub fn observe(method: &str, outcome: &str, elapsed_secs: f64) {
    REQUESTS_TOTAL.with_label_values(&[method, outcome]).inc();
    REQUEST_DURATION.observe(elapsed_secs);
}

pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return format!("# metrics encode error: {e}");
    }
    String::from_utf8(buffer).unwrap_or_default()
}
