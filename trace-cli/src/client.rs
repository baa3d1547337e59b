//! API Client
//!
//! HTTP client for communicating with the traceability API. Requests
//! authenticate with a bearer token when one is configured.

use crate::error::{CliError, CliResult};
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use trace_core::types::EntityKind;

/// Traceability API client
pub struct TraceClient {
    /// HTTP client
    client: Client,
    /// Base URL
    base_url: String,
    /// Bearer token, if authentication is enabled server-side
    token: Option<String>,
}

/// Map an entity kind onto its route segment
pub fn route_segment(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Farm => "farm",
        EntityKind::Harvest => "harvests",
        EntityKind::Batch => "batches",
        EntityKind::Lot => "lots",
        EntityKind::Consignment => "exporter/consignments",
    }
}

impl TraceClient {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CliError::connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token,
        })
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json(&self, builder: RequestBuilder) -> CliResult<serde_json::Value> {
        let response = self.authed(builder).send().await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(CliError::api(
                response.status().as_u16(),
                response.text().await.unwrap_or_default(),
            ))
        }
    }

    /// Get health status
    pub async fn health(&self) -> CliResult<HealthResponse> {
        let url = format!("{}/api/v1/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(CliError::api(
                response.status().as_u16(),
                response.text().await.unwrap_or_default(),
            ))
        }
    }

    /// Get service stats
    pub async fn stats(&self) -> CliResult<StatsResponse> {
        let url = format!("{}/api/v1/stats", self.base_url);
        let response = self.authed(self.client.get(&url)).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(CliError::api(
                response.status().as_u16(),
                response.text().await.unwrap_or_default(),
            ))
        }
    }

    /// Get the signed-in actor's role-scoped dashboard
    pub async fn dashboard(&self) -> CliResult<serde_json::Value> {
        let url = format!("{}/api/v1/dashboard", self.base_url);
        self.send_json(self.client.get(&url)).await
    }

    /// List entities of one kind
    pub async fn list(&self, kind: EntityKind) -> CliResult<serde_json::Value> {
        let url = format!("{}/api/v1/{}", self.base_url, route_segment(kind));
        self.send_json(self.client.get(&url)).await
    }

    /// Fetch one entity by id
    pub async fn get(&self, kind: EntityKind, id: &str) -> CliResult<serde_json::Value> {
        let url = format!("{}/api/v1/{}/{}", self.base_url, route_segment(kind), id);
        self.send_json(self.client.get(&url)).await
    }

    /// Legal next statuses for an entity as the acting role
    pub async fn actions(&self, kind: EntityKind, id: &str) -> CliResult<serde_json::Value> {
        let url = format!(
            "{}/api/v1/{}/{}/actions",
            self.base_url,
            route_segment(kind),
            id
        );
        self.send_json(self.client.get(&url)).await
    }

    /// Request a status transition
    pub async fn transition(
        &self,
        kind: EntityKind,
        id: &str,
        request: &TransitionRequest,
    ) -> CliResult<serde_json::Value> {
        let url = format!(
            "{}/api/v1/{}/{}/status",
            self.base_url,
            route_segment(kind),
            id
        );
        self.send_json(self.client.put(&url).json(request)).await
    }

    /// Recent audit records
    pub async fn audit(&self, limit: usize) -> CliResult<serde_json::Value> {
        let url = format!("{}/api/v1/audit?limit={}", self.base_url, limit);
        self.send_json(self.client.get(&url)).await
    }

    /// Get the signed-in profile
    pub async fn me(&self) -> CliResult<serde_json::Value> {
        let url = format!("{}/api/v1/user/me", self.base_url);
        self.send_json(self.client.get(&url)).await
    }

    /// Submit a KYC profile
    pub async fn submit_kyc(&self, display_name: &str, role: &str) -> CliResult<serde_json::Value> {
        let url = format!("{}/api/v1/kyc", self.base_url);
        let body = serde_json::json!({ "display_name": display_name, "role": role });
        self.send_json(self.client.post(&url).json(&body)).await
    }

    /// Review a pending KYC submission
    pub async fn review_kyc(&self, user_id: &str, status: &str) -> CliResult<serde_json::Value> {
        let url = format!("{}/api/v1/kyc/{}", self.base_url, user_id);
        let body = serde_json::json!({ "status": status });
        self.send_json(self.client.put(&url).json(&body)).await
    }
}

// ============================================
// Request/Response Types
// ============================================

/// Health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Stats response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_requests: u64,
    pub uptime_secs: u64,
    pub audit_records_verified: bool,
}

/// Transition request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_bags_received: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_weight_kg: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_segments() {
        assert_eq!(route_segment(EntityKind::Farm), "farm");
        assert_eq!(route_segment(EntityKind::Consignment), "exporter/consignments");
    }

    #[test]
    fn test_transition_request_omits_empty_receipt() {
        let request = TransitionRequest {
            status: "approved".to_string(),
            number_of_bags_received: None,
            received_weight_kg: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("number_of_bags_received"));
        assert!(json.contains("approved"));
    }

    #[test]
    fn test_health_response_deserialization() {
        let json = r#"{
            "status": "healthy",
            "version": "0.1.0",
            "uptime_secs": 3600
        }"#;

        let response: HealthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "healthy");
    }
}
