//! Traceability API - HTTP Interface Layer
//!
//! REST interface for the coffee traceability platform.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Traceability API              │
//! │  ┌─────────────────────────────────────┐    │
//! │  │           HTTP Routes               │    │
//! │  │   /farm, /harvests, /batches       │    │
//! │  │   /lots, /exporter/consignments    │    │
//! │  │   /dashboard, /kyc, /audit         │    │
//! │  └─────────────────────────────────────┘    │
//! │           │              │           │      │
//! │           ▼              ▼           ▼      │
//! │  ┌─────────────┐ ┌─────────────┐ ┌────────┐ │
//! │  │  Handlers   │ │    DTOs     │ │ State  │ │
//! │  └─────────────┘ └─────────────┘ └────────┘ │
//! └─────────────────────────────────────────────┘
//!           │                          │
//!           ▼                          ▼
//!      trace-store               trace-core
//! ```
//!
//! # Endpoints
//!
//! ## Health & Status
//! - `GET /health` - Service health check
//! - `GET /stats` - Service statistics
//!
//! ## Dashboard & Audit
//! - `GET /dashboard` - Role-scoped dashboard for the signed-in actor
//! - `GET /audit` - Recent audit records (reviewer roles)
//!
//! ## Entities
//! Each of `/farm`, `/harvests`, `/batches`, `/lots` and
//! `/exporter/consignments` carries the same shape:
//! - `POST /` - Create
//! - `GET /` - List (role-scoped)
//! - `GET /:id` - Fetch
//! - `PUT /:id/status` - Workflow transition
//! - `GET /:id/actions` - Legal next statuses for the acting role
//!
//! ## Users & KYC
//! - `GET /user/me` - Signed-in profile
//! - `POST /kyc` - Submit a KYC profile
//! - `GET /kyc/:user_id` / `PUT /kyc/:user_id` - Fetch / review
//!
//! # Usage Example
//!
//! ```ignore
//! use trace_api::{build_app, ApiConfig, AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ApiConfig::from_env();
//!     let state = AppState::with_config(config);
//!     let app = build_app(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

// Re-export main types
pub use auth::{AuthConfig, AuthErrorResponse};
pub use dto::*;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use metrics::{init_metrics, MetricsConfig};
pub use routes::{build_app, create_router, create_v1_router};
pub use state::{ApiConfig, AppState};

/// Traceability API version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API port
pub const DEFAULT_PORT: u16 = 3000;

/// Start the API server with the state's configured listen address
pub async fn start_server(state: AppState) -> Result<(), std::io::Error> {
    let addr = state.config.listen_addr.clone();
    let app = build_app(state);

    tracing::info!("Starting traceability API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_port() {
        assert_eq!(DEFAULT_PORT, 3000);
    }

    #[test]
    fn test_build_app() {
        let state = AppState::new();
        let _app = build_app(state);
    }

    #[test]
    fn test_error_response() {
        let err = ApiError::validation("Test error");
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
