//! Data Transfer Objects
//!
//! Request and response DTOs for the traceability API. Entities
//! serialize as-is in responses; requests carry only client-supplied
//! fields.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trace_core::types::{EntityKind, GeoShape, Role, ShippingMethod};

// ============================================
// Health / Stats
// ============================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Service statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_requests: u64,
    pub uptime_secs: u64,
    pub audit_records_verified: bool,
}

// ============================================
// Entity Creation
// ============================================

/// Register a farm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFarmRequest {
    pub name: String,
    pub location: GeoShape,
    #[serde(default)]
    pub area_hectares: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perimeter_m: Option<Decimal>,
    #[serde(default)]
    pub cultivation_methods: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

/// Record a harvest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHarvestRequest {
    pub farm_id: String,
    pub variety: String,
    pub weight_kg: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_date: Option<NaiveDate>,
    pub harvest_date: NaiveDate,
}

/// Submit a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBatchRequest {
    pub harvest_ids: Vec<String>,
    pub total_weight_kg: Decimal,
    pub number_of_bags: u32,
    /// Farmer-side blockchain transaction reference, if already anchored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_tx_ref: Option<String>,
}

/// Create a lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLotRequest {
    pub batch_ids: Vec<String>,
    pub total_output_weight_kg: Decimal,
}

/// Assemble a consignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConsignmentRequest {
    pub lot_ids: Vec<String>,
    pub destination_country: String,
    pub destination_port: String,
    pub shipping_method: ShippingMethod,
}

// ============================================
// Status Transitions
// ============================================

/// Request a status transition (`PUT .../status`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// Target status string
    pub status: String,
    /// Receipt quantities, for batch `submitted -> received`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_bags_received: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_weight_kg: Option<Decimal>,
}

/// Legal next actions for an entity in its current status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsResponse {
    pub kind: EntityKind,
    pub id: String,
    pub current_status: String,
    /// Statuses the acting role may move this entity to
    pub legal_targets: Vec<String>,
}

/// Record exporter receipt of a lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotReceiptRequest {
    pub received_weight_kg: Decimal,
}

// ============================================
// Users / KYC
// ============================================

/// Submit a KYC profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KycSubmitRequest {
    pub display_name: String,
    pub role: Role,
}

/// Review a KYC submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KycReviewRequest {
    /// `verified` or `rejected`
    pub status: String,
}
