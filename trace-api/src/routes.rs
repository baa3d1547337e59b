//! API Routes
//!
//! Route definitions for the traceability API.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::handlers::*;
use crate::metrics::metrics_middleware;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let enable_cors = state.config.enable_cors;

    let mut router = Router::new()
        // Health and status
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        // Role-scoped dashboard and audit trail
        .route("/dashboard", get(get_dashboard))
        .route("/audit", get(list_audit_records))
        // Farm endpoints
        .route("/farm", post(create_farm).get(list_farms))
        .route("/farm/:id", get(get_farm).delete(delete_farm))
        .route("/farm/:id/status", put(transition_farm))
        .route("/farm/:id/actions", get(get_farm_actions))
        // Harvest endpoints
        .route("/harvests", post(create_harvest).get(list_harvests))
        .route("/harvests/:id", get(get_harvest).delete(delete_harvest))
        .route("/harvests/:id/status", put(transition_harvest))
        .route("/harvests/:id/actions", get(get_harvest_actions))
        // Batch endpoints
        .route("/batches", post(create_batch).get(list_batches))
        .route("/batches/:id", get(get_batch).delete(delete_batch))
        .route("/batches/:id/status", put(transition_batch))
        .route("/batches/:id/actions", get(get_batch_actions))
        // Lot endpoints
        .route("/lots", post(create_lot).get(list_lots))
        .route("/lots/:id", get(get_lot).delete(delete_lot))
        .route("/lots/:id/status", put(transition_lot))
        .route("/lots/:id/receipt", post(record_lot_receipt))
        .route("/lots/:id/actions", get(get_lot_actions))
        // Consignment endpoints
        .route(
            "/exporter/consignments",
            post(create_consignment).get(list_consignments),
        )
        .route("/exporter/consignments/:id", get(get_consignment))
        .route(
            "/exporter/consignments/:id/status",
            put(transition_consignment),
        )
        .route(
            "/exporter/consignments/:id/actions",
            get(get_consignment_actions),
        )
        // User / KYC endpoints
        .route("/user/me", get(get_me))
        .route("/kyc", post(submit_kyc))
        .route("/kyc/:user_id", get(get_kyc).put(review_kyc))
        .with_state(state.clone());

    // Metrics middleware
    router = router.layer(middleware::from_fn_with_state(
        state.clone(),
        metrics_middleware,
    ));

    // Auth middleware always runs: with auth disabled it injects the
    // dev actor so handlers still get an identity
    router = router.layer(middleware::from_fn_with_state(state, auth_middleware));

    // CORS middleware
    if enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router = router.layer(TraceLayer::new_for_http());

    router
}

/// Create a router for the V1 API with /api/v1 prefix
pub fn create_v1_router(state: Arc<AppState>) -> Router {
    Router::new().nest("/api/v1", create_router(state))
}

/// Build the full application router
pub fn build_app(state: AppState) -> Router {
    let state = Arc::new(state);

    let root_router = Router::new().route("/", get(|| async { "Traceability API Service" }));

    let health_router = Router::new()
        .route("/healthz", get(health_check))
        .with_state(state.clone());

    root_router
        .merge(health_router)
        .merge(create_v1_router(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;
    use trace_core::types::{Actor, Role, UserId};

    fn test_state() -> AppState {
        AppState::new()
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_endpoint() {
        let app = build_app(test_state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_v1_health_endpoint() {
        let app = build_app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_farm_not_found() {
        let app = build_app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/farm/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_farm_as_dev_farmer() {
        let app = build_app(test_state());

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/v1/farm",
                serde_json::json!({
                    "name": "Gashonga Hill",
                    "location": { "type": "point", "point": { "lat": -2.0, "lng": 29.7 } }
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "pending");
        assert_eq!(body["owner_id"], "user:dev");
    }

    #[tokio::test]
    async fn test_farmer_cannot_approve_farm() {
        let state = test_state();
        let app = build_app(state);

        let created = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/farm",
                serde_json::json!({
                    "name": "Gashonga Hill",
                    "location": { "type": "point", "point": { "lat": -2.0, "lng": 29.7 } }
                }),
            ))
            .await
            .unwrap();
        let farm = body_json(created).await;
        let farm_id = farm["farm_id"].as_str().unwrap();

        // Dev actor defaults to farmer; approval is extension-worker only
        let response = app
            .oneshot(json_request(
                Method::PUT,
                &format!("/api/v1/farm/{}/status", farm_id),
                serde_json::json!({ "status": "approved" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_extension_worker_approves_farm_via_debug_header() {
        let app = build_app(test_state());

        let created = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/farm",
                serde_json::json!({
                    "name": "Gashonga Hill",
                    "location": { "type": "point", "point": { "lat": -2.0, "lng": 29.7 } }
                }),
            ))
            .await
            .unwrap();
        let farm = body_json(created).await;
        let farm_id = farm["farm_id"].as_str().unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri(format!("/api/v1/farm/{}/status", farm_id))
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("X-Debug-Role", "extension_worker")
                    .body(Body::from(
                        serde_json::json!({ "status": "approved" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "approved");
    }

    #[tokio::test]
    async fn test_skip_transition_is_conflict() {
        let app = build_app(test_state());

        let created = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/farm",
                serde_json::json!({
                    "name": "Gashonga Hill",
                    "location": { "type": "point", "point": { "lat": -2.0, "lng": 29.7 } }
                }),
            ))
            .await
            .unwrap();
        let farm = body_json(created).await;
        let farm_id = farm["farm_id"].as_str().unwrap();
        let uri = format!("/api/v1/farm/{}/status", farm_id);

        let approve = |status: &str| {
            Request::builder()
                .method(Method::PUT)
                .uri(&uri)
                .header(header::CONTENT_TYPE, "application/json")
                .header("X-Debug-Role", "extension_worker")
                .body(Body::from(
                    serde_json::json!({ "status": status }).to_string(),
                ))
                .unwrap()
        };

        let response = app.clone().oneshot(approve("approved")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // approved -> rejected has no edge in the workflow table
        let response = app.oneshot(approve("rejected")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unknown_status_is_bad_request() {
        let app = build_app(test_state());

        let created = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/farm",
                serde_json::json!({
                    "name": "Gashonga Hill",
                    "location": { "type": "point", "point": { "lat": -2.0, "lng": 29.7 } }
                }),
            ))
            .await
            .unwrap();
        let farm = body_json(created).await;
        let farm_id = farm["farm_id"].as_str().unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri(format!("/api/v1/farm/{}/status", farm_id))
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("X-Debug-Role", "extension_worker")
                    .body(Body::from(
                        serde_json::json!({ "status": "archived" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_actions_endpoint_lists_legal_targets() {
        let app = build_app(test_state());

        let created = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/farm",
                serde_json::json!({
                    "name": "Gashonga Hill",
                    "location": { "type": "point", "point": { "lat": -2.0, "lng": 29.7 } }
                }),
            ))
            .await
            .unwrap();
        let farm = body_json(created).await;
        let farm_id = farm["farm_id"].as_str().unwrap();

        // As the extension worker there are two legal moves
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/farm/{}/actions", farm_id))
                    .header("X-Debug-Role", "extension_worker")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["legal_targets"].as_array().unwrap().len(), 2);

        // As the farmer there are none
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/farm/{}/actions", farm_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert!(body["legal_targets"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_for_regulator_is_read_only() {
        let app = build_app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/dashboard")
                    .header("X-Debug-Role", "regulator")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["read_only"], true);
    }

    #[tokio::test]
    async fn test_auth_enabled_rejects_missing_token() {
        let actor = Actor::new(UserId::new("user:amina"), Role::Farmer);
        let state =
            AppState::new().with_auth(AuthConfig::default().with_token("s3cret", actor));
        let app = build_app(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/farm")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/farm")
                    .header(header::AUTHORIZATION, "Bearer s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_audit_is_reviewer_only() {
        let app = build_app(test_state());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/audit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/audit")
                    .header("X-Debug-Role", "regulator")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_kyc_flow_over_http() {
        let app = build_app(test_state());

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/kyc",
                serde_json::json!({ "display_name": "Amina", "role": "farmer" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["kyc_status"], "pending");

        // Pending KYC blocks entity creation
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/farm",
                serde_json::json!({
                    "name": "Gashonga Hill",
                    "location": { "type": "point", "point": { "lat": -2.0, "lng": 29.7 } }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Extension worker verifies, farmer can transact
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/api/v1/kyc/user:dev")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("X-Debug-Role", "extension_worker")
                    .body(Body::from(
                        serde_json::json!({ "status": "verified" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/v1/farm",
                serde_json::json!({
                    "name": "Gashonga Hill",
                    "location": { "type": "point", "point": { "lat": -2.0, "lng": 29.7 } }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
