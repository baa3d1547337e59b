//! Authentication and Actor Resolution
//!
//! Bearer-token authentication for the traceability API. A token maps
//! to an [`Actor`] (user id + role) which the middleware injects as a
//! request extension, so handlers receive the acting identity
//! explicitly instead of reading ambient session state.
//!
//! # Authentication
//!
//! ```text
//! Authorization: Bearer your-token-here
//! ```
//!
//! # Configuration
//!
//! - `TRACE_AUTH_ENABLED`: Enable/disable authentication (default: false)
//! - `TRACE_TOKENS`: Comma-separated `token:role:user-id` triples, e.g.
//!   `s3cret:farmer:user:amina,tok2:processor:user:kigali-mill`
//!
//! With authentication disabled (development), requests act as a
//! configurable dev actor, overridable per request via the
//! `X-Debug-User` and `X-Debug-Role` headers.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use trace_core::{Actor, Role, UserId};

use crate::state::AppState;

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Whether authentication is enabled
    pub enabled: bool,
    /// Bearer token -> actor table
    pub tokens: HashMap<String, Actor>,
    /// Paths that don't require authentication
    pub public_paths: Vec<String>,
    /// Actor used when authentication is disabled
    pub dev_actor: Actor,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tokens: HashMap::new(),
            public_paths: vec![
                "/".to_string(),
                "/health".to_string(),
                "/healthz".to_string(),
                "/api/v1/health".to_string(),
            ],
            dev_actor: Actor::new(UserId::new("user:dev"), Role::Farmer),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let enabled = std::env::var("TRACE_AUTH_ENABLED")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let mut tokens = HashMap::new();
        if let Ok(raw) = std::env::var("TRACE_TOKENS") {
            for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
                // token:role:user-id (user ids may themselves contain colons)
                let mut parts = entry.splitn(3, ':');
                let (token, role, user) = match (parts.next(), parts.next(), parts.next()) {
                    (Some(t), Some(r), Some(u)) => (t, r, u),
                    _ => {
                        tracing::warn!(entry, "ignoring malformed TRACE_TOKENS entry");
                        continue;
                    }
                };
                match Role::parse(role) {
                    Ok(role) => {
                        tokens.insert(
                            token.to_string(),
                            Actor::new(UserId::new(user), role),
                        );
                    }
                    Err(_) => {
                        tracing::warn!(entry, role, "ignoring TRACE_TOKENS entry with unknown role");
                    }
                }
            }
        }

        Self {
            enabled,
            tokens,
            ..Default::default()
        }
    }

    /// Register a token for an actor
    pub fn with_token(mut self, token: impl Into<String>, actor: Actor) -> Self {
        self.tokens.insert(token.into(), actor);
        self.enabled = true;
        self
    }

    /// Check if a path is public (doesn't require authentication)
    pub fn is_public_path(&self, path: &str) -> bool {
        self.public_paths
            .iter()
            .any(|p| path == p || path.starts_with(&format!("{}/", p)))
    }

    /// Resolve a bearer token to its actor
    pub fn resolve_token(&self, token: &str) -> Option<&Actor> {
        self.tokens.get(token)
    }
}

/// Authentication error response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub error_code: String,
    pub message: String,
}

impl AuthErrorResponse {
    pub fn unauthorized(message: &str) -> Self {
        Self {
            error: "Unauthorized".to_string(),
            error_code: "AUTH_UNAUTHORIZED".to_string(),
            message: message.to_string(),
        }
    }
}

/// Authentication middleware: resolves the acting identity and injects
/// it as a request extension.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_config = &state.auth_config;

    // Development mode: act as the dev actor, header-overridable
    if !auth_config.enabled {
        let actor = dev_actor_from_headers(&request, &auth_config.dev_actor);
        request.extensions_mut().insert(actor);
        return next.run(request).await;
    }

    let path = request.uri().path();
    if auth_config.is_public_path(path) {
        return next.run(request).await;
    }

    if let Some(auth_header) = request.headers().get(AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                if let Some(actor) = auth_config.resolve_token(token) {
                    request.extensions_mut().insert(actor.clone());
                    return next.run(request).await;
                }
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(AuthErrorResponse::unauthorized("Invalid bearer token")),
                )
                    .into_response();
            }
        }
    }

    (
        StatusCode::UNAUTHORIZED,
        Json(AuthErrorResponse::unauthorized(
            "Missing Authorization: Bearer header",
        )),
    )
        .into_response()
}

fn dev_actor_from_headers(request: &Request, fallback: &Actor) -> Actor {
    let user = request
        .headers()
        .get("X-Debug-User")
        .and_then(|v| v.to_str().ok());
    let role = request
        .headers()
        .get("X-Debug-Role")
        .and_then(|v| v.to_str().ok())
        .and_then(|r| Role::parse(r).ok());
    match (user, role) {
        (Some(user), Some(role)) => Actor::new(UserId::new(user), role),
        (Some(user), None) => Actor::new(UserId::new(user), fallback.role),
        (None, Some(role)) => Actor::new(fallback.user_id.clone(), role),
        (None, None) => fallback.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled_with_public_health() {
        let config = AuthConfig::default();
        assert!(!config.enabled);
        assert!(config.is_public_path("/health"));
        assert!(config.is_public_path("/api/v1/health"));
        assert!(!config.is_public_path("/api/v1/farm"));
    }

    #[test]
    fn test_token_resolution() {
        let actor = Actor::new(UserId::new("user:amina"), Role::Farmer);
        let config = AuthConfig::default().with_token("s3cret", actor.clone());
        assert!(config.enabled);
        assert_eq!(config.resolve_token("s3cret"), Some(&actor));
        assert_eq!(config.resolve_token("wrong"), None);
    }

    #[test]
    fn test_token_env_format_allows_colons_in_user_id() {
        // token:role:user-id where the user id itself contains colons
        let mut parts = "tok:processor:user:kigali-mill".splitn(3, ':');
        assert_eq!(parts.next(), Some("tok"));
        assert_eq!(parts.next(), Some("processor"));
        assert_eq!(parts.next(), Some("user:kigali-mill"));
    }
}
