//! API Handlers
//!
//! HTTP handler implementations for the traceability API. Every
//! mutating handler receives the acting identity as an [`Actor`]
//! extension injected by the auth middleware; role and workflow checks
//! happen in the store layer, KYC and creation-role checks here.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use trace_core::reconcile::ReceiptRecord;
use trace_core::types::{
    Actor, Batch, ChainAnchor, Consignment, EntityKind, Farm, Harvest, HarvestId, KycStatus, Lot,
    Role, UserProfile,
};
use trace_core::{legal_targets, BatchId, LotId};
use trace_store::repos::{
    BatchRepository, ConsignmentRepository, FarmRepository, HarvestRepository, LotRepository,
    UserRepository,
};
use trace_store::{AuditRecord, Dashboard};

use crate::dto::*;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Health check handler
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.config.version.clone(),
        uptime_secs: state.uptime_secs(),
    }))
}

/// Get service statistics
pub async fn get_stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatsResponse>> {
    Ok(Json(StatsResponse {
        total_requests: state.request_count().await,
        uptime_secs: state.uptime_secs(),
        audit_records_verified: state.store.audit_verified().await,
    }))
}

/// Resolve the signed-in actor's role-scoped dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Dashboard>> {
    Ok(Json(state.store.dashboard(&actor).await?))
}

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default = "default_audit_limit")]
    pub limit: usize,
}

fn default_audit_limit() -> usize {
    50
}

/// Recent audit records, newest first (regulator / extension worker)
pub async fn list_audit_records(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<AuditQuery>,
) -> ApiResult<Json<Vec<AuditRecord>>> {
    match actor.role {
        Role::Regulator | Role::ExtensionWorker => {}
        _ => return Err(ApiError::forbidden("Audit log is reviewer-only")),
    }
    Ok(Json(state.store.audit_recent(query.limit).await))
}

/// A verified KYC profile is required before creating entities or
/// triggering transitions. Actors without a stored profile are allowed
/// through: their identity was already established by the token table.
async fn require_transactable(state: &AppState, actor: &Actor) -> ApiResult<()> {
    if let Some(profile) = state.store.get_user(actor.user_id.as_str()).await? {
        if !profile.can_transact() {
            return Err(ApiError::forbidden(format!(
                "KYC status is {}, not verified",
                profile.kyc_status.as_str()
            )));
        }
    }
    Ok(())
}

fn require_role(actor: &Actor, role: Role, action: &str) -> ApiResult<()> {
    // Extension workers administer the platform and may act anywhere
    if actor.role == role || actor.role == Role::ExtensionWorker {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "Only a {} may {}",
            role.as_str(),
            action
        )))
    }
}

// ============================================
// Farm Handlers
// ============================================

/// Register a farm (farmer)
pub async fn create_farm(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateFarmRequest>,
) -> ApiResult<Json<Farm>> {
    require_role(&actor, Role::Farmer, "register a farm")?;
    require_transactable(&state, &actor).await?;
    if request.name.trim().is_empty() {
        return Err(ApiError::validation("Farm name must not be empty"));
    }

    let mut farm = Farm::new(actor.user_id.clone(), request.name, request.location);
    farm.area_hectares = request.area_hectares;
    farm.perimeter_m = request.perimeter_m;
    farm.cultivation_methods = request.cultivation_methods;
    farm.certifications = request.certifications;

    Ok(Json(state.store.create_farm(&actor, farm).await?))
}

/// List active farms; farmers see their own
pub async fn list_farms(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Farm>>> {
    let owner = match actor.role {
        Role::Farmer => Some(actor.user_id.as_str().to_string()),
        _ => None,
    };
    Ok(Json(state.store.list_farms(owner.as_deref()).await?))
}

/// Get farm by id
pub async fn get_farm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Farm>> {
    Ok(Json(state.store.get_farm_required(&id).await?))
}

/// Transition farm status (`pending -> approved|rejected` by extension worker)
pub async fn transition_farm(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> ApiResult<Json<Farm>> {
    require_transactable(&state, &actor).await?;
    Ok(Json(
        state.store.transition_farm(&actor, &id, &request.status).await?,
    ))
}

/// Legal next statuses for a farm, as the acting role
pub async fn get_farm_actions(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<ActionsResponse>> {
    let farm = state.store.get_farm_required(&id).await?;
    Ok(Json(actions(
        EntityKind::Farm,
        &id,
        farm.status.as_str(),
        actor.role,
    )))
}

/// Soft-delete a farm
pub async fn delete_farm(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let farm = state.store.get_farm_required(&id).await?;
    if actor.role != Role::ExtensionWorker && farm.owner_id != actor.user_id {
        return Err(ApiError::forbidden("Only the owner may delete a farm"));
    }
    state.store.soft_delete_farm(&actor, &id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

// ============================================
// Harvest Handlers
// ============================================

#[derive(Debug, Deserialize)]
pub struct HarvestListQuery {
    pub farm_id: Option<String>,
}

/// Record a harvest against one of the farmer's farms
pub async fn create_harvest(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateHarvestRequest>,
) -> ApiResult<Json<Harvest>> {
    require_role(&actor, Role::Farmer, "record a harvest")?;
    require_transactable(&state, &actor).await?;
    if request.weight_kg <= Decimal::ZERO {
        return Err(ApiError::validation("Harvest weight must be positive"));
    }

    let farm = state.store.get_farm_required(&request.farm_id).await?;
    if actor.role == Role::Farmer && farm.owner_id != actor.user_id {
        return Err(ApiError::forbidden("Farm belongs to another farmer"));
    }

    let mut harvest = Harvest::new(
        farm.farm_id,
        request.variety,
        request.weight_kg,
        request.harvest_date,
    );
    harvest.planting_date = request.planting_date;

    Ok(Json(state.store.create_harvest(&actor, harvest).await?))
}

/// List active harvests, optionally for one farm
pub async fn list_harvests(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HarvestListQuery>,
) -> ApiResult<Json<Vec<Harvest>>> {
    Ok(Json(
        state.store.list_harvests(query.farm_id.as_deref()).await?,
    ))
}

/// Get harvest by id
pub async fn get_harvest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Harvest>> {
    Ok(Json(state.store.get_harvest_required(&id).await?))
}

/// Transition harvest status
pub async fn transition_harvest(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> ApiResult<Json<Harvest>> {
    require_transactable(&state, &actor).await?;
    Ok(Json(
        state
            .store
            .transition_harvest(&actor, &id, &request.status)
            .await?,
    ))
}

/// Legal next statuses for a harvest, as the acting role
pub async fn get_harvest_actions(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<ActionsResponse>> {
    let harvest = state.store.get_harvest_required(&id).await?;
    Ok(Json(actions(
        EntityKind::Harvest,
        &id,
        harvest.status.as_str(),
        actor.role,
    )))
}

/// Soft-delete a harvest
pub async fn delete_harvest(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store.soft_delete_harvest(&actor, &id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

// ============================================
// Batch Handlers
// ============================================

/// Submit a batch of harvests (farmer)
pub async fn create_batch(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateBatchRequest>,
) -> ApiResult<Json<Batch>> {
    require_role(&actor, Role::Farmer, "submit a batch")?;
    require_transactable(&state, &actor).await?;
    if request.harvest_ids.is_empty() {
        return Err(ApiError::validation("A batch needs at least one harvest"));
    }
    if request.total_weight_kg <= Decimal::ZERO {
        return Err(ApiError::validation("Batch weight must be positive"));
    }
    if request.number_of_bags == 0 {
        return Err(ApiError::validation("Bag count must be positive"));
    }

    let harvest_ids = request.harvest_ids.into_iter().map(HarvestId::new).collect();
    let mut batch = Batch::new(
        actor.user_id.clone(),
        harvest_ids,
        request.total_weight_kg,
        request.number_of_bags,
    );
    if let Some(tx_ref) = request.anchor_tx_ref {
        batch.farmer_anchor = Some(ChainAnchor::pending(tx_ref));
    }

    Ok(Json(state.store.create_batch(&actor, batch).await?))
}

/// List active batches the actor holds or submitted
pub async fn list_batches(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Batch>>> {
    let holder = match actor.role {
        Role::ExtensionWorker | Role::Regulator => None,
        _ => Some(actor.user_id.as_str().to_string()),
    };
    Ok(Json(state.store.list_batches(holder.as_deref()).await?))
}

/// Get batch by id
pub async fn get_batch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Batch>> {
    Ok(Json(state.store.get_batch_required(&id).await?))
}

/// Transition batch status. `received` takes the processor's counted
/// quantities and runs reconciliation.
pub async fn transition_batch(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> ApiResult<Json<Batch>> {
    require_transactable(&state, &actor).await?;
    let receipt = match (request.number_of_bags_received, request.received_weight_kg) {
        (Some(bags), Some(weight_kg)) => Some(ReceiptRecord { bags, weight_kg }),
        (None, None) => None,
        _ => {
            return Err(ApiError::validation(
                "Receipt needs both bag count and weight",
            ))
        }
    };
    if request.status == "received" && receipt.is_none() {
        return Err(ApiError::validation(
            "Receiving a batch requires the counted bags and weight",
        ));
    }
    Ok(Json(
        state
            .store
            .transition_batch(&actor, &id, &request.status, receipt)
            .await?,
    ))
}

/// Legal next statuses for a batch, as the acting role
pub async fn get_batch_actions(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<ActionsResponse>> {
    let batch = state.store.get_batch_required(&id).await?;
    Ok(Json(actions(
        EntityKind::Batch,
        &id,
        batch.status.as_str(),
        actor.role,
    )))
}

/// Soft-delete a batch
pub async fn delete_batch(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store.soft_delete_batch(&actor, &id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

// ============================================
// Lot Handlers
// ============================================

/// Create a lot from processed batches (processor)
pub async fn create_lot(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateLotRequest>,
) -> ApiResult<Json<Lot>> {
    require_role(&actor, Role::Processor, "create a lot")?;
    require_transactable(&state, &actor).await?;
    if request.batch_ids.is_empty() {
        return Err(ApiError::validation("A lot needs at least one batch"));
    }

    let batch_ids = request.batch_ids.into_iter().map(BatchId::new).collect();
    let lot = Lot::new(
        actor.user_id.clone(),
        batch_ids,
        request.total_output_weight_kg,
    );

    Ok(Json(state.store.create_lot(&actor, lot).await?))
}

/// List active lots; processors see their own
pub async fn list_lots(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Lot>>> {
    let processor = match actor.role {
        Role::Processor => Some(actor.user_id.as_str().to_string()),
        _ => None,
    };
    Ok(Json(state.store.list_lots(processor.as_deref()).await?))
}

/// Get lot by id
pub async fn get_lot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Lot>> {
    Ok(Json(state.store.get_lot_required(&id).await?))
}

/// Transition lot status
pub async fn transition_lot(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> ApiResult<Json<Lot>> {
    require_transactable(&state, &actor).await?;
    Ok(Json(
        state.store.transition_lot(&actor, &id, &request.status).await?,
    ))
}

/// Record exporter receipt of a lot
pub async fn record_lot_receipt(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<LotReceiptRequest>,
) -> ApiResult<Json<Lot>> {
    require_role(&actor, Role::Exporter, "receive a lot")?;
    require_transactable(&state, &actor).await?;
    Ok(Json(
        state
            .store
            .record_lot_receipt(&actor, &id, request.received_weight_kg)
            .await?,
    ))
}

/// Legal next statuses for a lot, as the acting role
pub async fn get_lot_actions(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<ActionsResponse>> {
    let lot = state.store.get_lot_required(&id).await?;
    Ok(Json(actions(
        EntityKind::Lot,
        &id,
        lot.status.as_str(),
        actor.role,
    )))
}

/// Soft-delete a lot
pub async fn delete_lot(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store.soft_delete_lot(&actor, &id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

// ============================================
// Consignment Handlers
// ============================================

/// Assemble an export consignment (exporter)
pub async fn create_consignment(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateConsignmentRequest>,
) -> ApiResult<Json<Consignment>> {
    require_role(&actor, Role::Exporter, "assemble a consignment")?;
    require_transactable(&state, &actor).await?;
    if request.lot_ids.is_empty() {
        return Err(ApiError::validation(
            "A consignment needs at least one lot",
        ));
    }

    let lot_ids = request.lot_ids.into_iter().map(LotId::new).collect();
    let consignment = Consignment::new(
        actor.user_id.clone(),
        lot_ids,
        request.destination_country,
        request.destination_port,
        request.shipping_method,
    );

    Ok(Json(
        state.store.create_consignment(&actor, consignment).await?,
    ))
}

/// List consignments; exporters see their own
pub async fn list_consignments(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Consignment>>> {
    let exporter = match actor.role {
        Role::Exporter => Some(actor.user_id.as_str().to_string()),
        _ => None,
    };
    Ok(Json(
        state.store.list_consignments(exporter.as_deref()).await?,
    ))
}

/// Get consignment by id
pub async fn get_consignment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Consignment>> {
    Ok(Json(state.store.get_consignment_required(&id).await?))
}

/// Transition consignment status (`created -> exported`)
pub async fn transition_consignment(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> ApiResult<Json<Consignment>> {
    require_transactable(&state, &actor).await?;
    Ok(Json(
        state
            .store
            .transition_consignment(&actor, &id, &request.status)
            .await?,
    ))
}

/// Legal next statuses for a consignment, as the acting role
pub async fn get_consignment_actions(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<ActionsResponse>> {
    let consignment = state.store.get_consignment_required(&id).await?;
    Ok(Json(actions(
        EntityKind::Consignment,
        &id,
        consignment.status.as_str(),
        actor.role,
    )))
}

// ============================================
// User / KYC Handlers
// ============================================

/// Get the signed-in user's profile
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<UserProfile>> {
    state
        .store
        .get_user(actor.user_id.as_str())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User", actor.user_id.as_str()))
}

/// Submit a KYC profile for the signed-in user
pub async fn submit_kyc(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<KycSubmitRequest>,
) -> ApiResult<Json<UserProfile>> {
    if request.display_name.trim().is_empty() {
        return Err(ApiError::validation("Display name must not be empty"));
    }
    if let Some(existing) = state.store.get_user(actor.user_id.as_str()).await? {
        if existing.kyc_status != KycStatus::Rejected {
            return Err(ApiError::validation(format!(
                "KYC already submitted ({})",
                existing.kyc_status.as_str()
            )));
        }
    }
    let profile = UserProfile::new(actor.user_id.clone(), request.display_name, request.role);
    Ok(Json(state.store.upsert_user(profile).await?))
}

/// Get a user's KYC profile (extension worker)
pub async fn get_kyc(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    if actor.role != Role::ExtensionWorker && actor.user_id.as_str() != user_id {
        return Err(ApiError::forbidden("KYC profiles are reviewer-only"));
    }
    Ok(Json(state.store.get_user_required(&user_id).await?))
}

/// Review a pending KYC submission (extension worker)
pub async fn review_kyc(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<String>,
    Json(request): Json<KycReviewRequest>,
) -> ApiResult<Json<UserProfile>> {
    let target = match KycStatus::parse(&request.status) {
        Some(KycStatus::Verified) => KycStatus::Verified,
        Some(KycStatus::Rejected) => KycStatus::Rejected,
        _ => {
            return Err(ApiError::validation(
                "KYC review outcome must be verified or rejected",
            ))
        }
    };
    Ok(Json(state.store.review_kyc(&actor, &user_id, target).await?))
}

fn actions(kind: EntityKind, id: &str, current: &str, role: Role) -> ActionsResponse {
    ActionsResponse {
        kind,
        id: id.to_string(),
        current_status: current.to_string(),
        legal_targets: legal_targets(kind, current, role)
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}
