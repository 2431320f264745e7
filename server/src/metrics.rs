//! Prometheus metrics for request outcomes.

use metrics::counter;

/// Initialize metrics exporter (Prometheus).
pub fn init_metrics() {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    if let Err(e) = builder.install() {
        tracing::warn!("Failed to install Prometheus exporter: {}", e);
    }
}

/// Record a narrative estimate request and its outcome.
pub fn narrative_request(outcome: &str) {
    counter!("traffic_narrative_requests_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a numeric prediction and its outcome.
pub fn prediction(outcome: &str) {
    counter!("traffic_predictions_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a login attempt.
pub fn login_attempt(outcome: &str) {
    counter!("traffic_login_attempts_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a completed registration.
pub fn user_registered() {
    counter!("traffic_users_registered_total").increment(1);
}
