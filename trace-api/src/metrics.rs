//! Prometheus Metrics
//!
//! Request metrics for the traceability API.
//!
//! # Metrics
//!
//! ## Counters
//! - `trace_http_requests_total` - Total HTTP requests by method, path, status
//! - `trace_transitions_total` - Status transitions by entity kind and outcome
//! - `trace_errors_total` - Total errors by type
//!
//! ## Histograms
//! - `trace_http_request_duration_seconds` - HTTP request duration
//!
//! ## Gauges
//! - `trace_active_requests` - Currently active requests
//! - `trace_uptime_seconds` - Service uptime
//!
//! # Configuration
//!
//! - `TRACE_METRICS_ENABLED`: Enable metrics (default: true)
//! - `TRACE_METRICS_PORT`: Metrics server port (default: 9090)

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::state::AppState;

/// Metrics configuration
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled
    pub enabled: bool,
    /// Port for metrics endpoint
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 9090,
        }
    }
}

impl MetricsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let enabled = std::env::var("TRACE_METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        let port = std::env::var("TRACE_METRICS_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(9090);

        Self { enabled, port }
    }
}

/// Initialize the Prometheus exporter. Call once at startup.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), String> {
    if !config.enabled {
        tracing::info!("Metrics disabled");
        return Ok(());
    }

    PrometheusBuilder::new()
        .install()
        .map_err(|e| format!("Failed to install metrics recorder: {}", e))?;

    tracing::info!("Metrics initialized");
    Ok(())
}

/// Record a request metric
pub fn record_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", normalize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("trace_http_requests_total", &labels).increment(1);
    histogram!("trace_http_request_duration_seconds", &labels).record(duration_secs);
}

/// Record a status transition attempt
pub fn record_transition(kind: &str, outcome: &str) {
    let labels = [
        ("kind", kind.to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!("trace_transitions_total", &labels).increment(1);
}

/// Record an error
pub fn record_error(error_type: &str) {
    counter!("trace_errors_total", "type" => error_type.to_string()).increment(1);
}

/// Update active requests gauge
pub fn set_active_requests(count: u64) {
    gauge!("trace_active_requests").set(count as f64);
}

/// Requests currently in flight. Incremented on entry, decremented when
/// the response comes back, so the gauge tracks concurrency rather than
/// a running total.
static ACTIVE_REQUESTS: AtomicU64 = AtomicU64::new(0);

fn enter_request(active: &AtomicU64) -> u64 {
    active.fetch_add(1, Ordering::Relaxed) + 1
}

fn exit_request(active: &AtomicU64) -> u64 {
    active.fetch_sub(1, Ordering::Relaxed).saturating_sub(1)
}

/// Update uptime gauge
pub fn set_uptime(seconds: u64) {
    gauge!("trace_uptime_seconds").set(seconds as f64);
}

/// Normalize path for metric labels (collapse dynamic id segments)
fn normalize_path(path: &str) -> String {
    let path = replace_id_segments(path);

    if path.len() > 50 {
        path[..50].to_string()
    } else {
        path
    }
}

/// Replace entity-id path segments with a placeholder. Ids are
/// `prefix:uuid` strings, so any segment containing a colon or a long
/// hex/uuid run counts.
fn replace_id_segments(path: &str) -> String {
    path.split('/')
        .map(|part| {
            let id_like = part.contains(':')
                || (part.len() >= 8
                    && part.chars().all(|c| c.is_ascii_hexdigit() || c == '-'));
            if id_like {
                ":id".to_string()
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Metrics middleware for tracking HTTP requests
pub async fn metrics_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    state.increment_requests().await;
    set_active_requests(enter_request(&ACTIVE_REQUESTS));
    set_uptime(state.uptime_secs());

    let response = next.run(request).await;

    set_active_requests(exit_request(&ACTIVE_REQUESTS));

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();
    record_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
        assert_eq!(
            normalize_path("/api/v1/farm/farm:550e8400"),
            "/api/v1/farm/:id"
        );
        assert_eq!(
            normalize_path("/api/v1/batches/abcdef1234/status"),
            "/api/v1/batches/:id/status"
        );
    }

    #[test]
    fn test_short_segments_are_not_ids() {
        assert_eq!(replace_id_segments("/api/v1/lots"), "/api/v1/lots");
        assert_eq!(replace_id_segments("/kyc/user:amina"), "/kyc/:id");
    }

    #[test]
    fn test_active_requests_return_to_zero_after_completion() {
        let active = AtomicU64::new(0);
        assert_eq!(enter_request(&active), 1);
        assert_eq!(enter_request(&active), 2);
        assert_eq!(exit_request(&active), 1);
        assert_eq!(exit_request(&active), 0);
        assert_eq!(active.load(Ordering::Relaxed), 0);
    }
}
