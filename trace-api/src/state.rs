//! Application State
//!
//! Shared state for the traceability API service.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use trace_store::MemoryStore;

use crate::auth::AuthConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Service name
    pub service_name: String,
    /// Service version
    pub version: String,
    /// Listen address
    pub listen_addr: String,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            service_name: "trace-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            listen_addr: "0.0.0.0:3000".to_string(),
            enable_cors: true,
        }
    }
}

impl ApiConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("TRACE_LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Ok(cors) = std::env::var("TRACE_ENABLE_CORS") {
            config.enable_cors = cors.to_lowercase() != "false" && cors != "0";
        }
        config
    }
}

/// Application state shared across handlers
pub struct AppState {
    /// Configuration
    pub config: ApiConfig,
    /// Authentication configuration
    pub auth_config: AuthConfig,
    /// Datastore
    pub store: Arc<MemoryStore>,
    /// Service start time
    pub started_at: DateTime<Utc>,
    /// Request counter
    request_counter: RwLock<u64>,
}

impl AppState {
    /// Create new application state with default config
    pub fn new() -> Self {
        Self::with_config(ApiConfig::default())
    }

    /// Create with configuration
    pub fn with_config(config: ApiConfig) -> Self {
        Self {
            config,
            auth_config: AuthConfig::default(),
            store: Arc::new(MemoryStore::new()),
            started_at: Utc::now(),
            request_counter: RwLock::new(0),
        }
    }

    /// Set authentication configuration
    pub fn with_auth(mut self, auth_config: AuthConfig) -> Self {
        self.auth_config = auth_config;
        self
    }

    /// Get service uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        let now = Utc::now();
        (now - self.started_at).num_seconds().max(0) as u64
    }

    /// Increment request counter
    pub async fn increment_requests(&self) -> u64 {
        let mut counter = self.request_counter.write().await;
        *counter += 1;
        *counter
    }

    /// Get request count
    pub async fn request_count(&self) -> u64 {
        *self.request_counter.read().await
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_default() {
        let config = ApiConfig::default();
        assert_eq!(config.service_name, "trace-api");
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert!(config.enable_cors);
    }

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.uptime_secs() < 2);
    }

    #[tokio::test]
    async fn test_request_counter() {
        let state = AppState::new();
        assert_eq!(state.request_count().await, 0);
        assert_eq!(state.increment_requests().await, 1);
        assert_eq!(state.increment_requests().await, 2);
        assert_eq!(state.request_count().await, 2);
    }
}
