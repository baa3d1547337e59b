//! Traceability Error Registry
//!
//! Error code format: TRC-{module}-{sequence}
//! - TRC-FLOW: Status workflow violations
//! - TRC-GRAPH: Relationship graph violations
//! - TRC-VIEW: Role scoping errors
//! - TRC-CUSTODY: Custody chain violations
//! - TRC-WEIGHT: Weight reconciliation errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Trace Result type
pub type TraceResult<T> = Result<T, TraceError>;

/// Domain-level error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    // ============================================================
    // Workflow Errors (TRC-FLOW-*)
    // ============================================================
    /// [TRC-FLOW-001] Transition not in the entity's table
    #[error("[TRC-FLOW-001] Illegal transition for {kind}: {from} -> {to}")]
    IllegalTransition {
        kind: String,
        from: String,
        to: String,
    },

    /// [TRC-FLOW-002] Entity kind or status string not recognized
    #[error("[TRC-FLOW-002] Unknown transition input for {kind}: {from} -> {to}")]
    UnknownTransition {
        kind: String,
        from: String,
        to: String,
    },

    /// [TRC-FLOW-003] Transition exists but the actor role may not trigger it
    #[error("[TRC-FLOW-003] Role {role} may not trigger {kind} transition {from} -> {to}")]
    RoleNotPermitted {
        kind: String,
        from: String,
        to: String,
        role: String,
    },

    // ============================================================
    // Graph Errors (TRC-GRAPH-*)
    // ============================================================
    /// [TRC-GRAPH-001] No aggregation edge defined for this parent kind
    #[error("[TRC-GRAPH-001] No child edge defined for {kind}")]
    UnknownEdge { kind: String },

    /// [TRC-GRAPH-002] Child already attached to another parent
    #[error("[TRC-GRAPH-002] Child {child_id} already attached to parent {owner_id}")]
    ConflictingOwnership { child_id: String, owner_id: String },

    // ============================================================
    // View Errors (TRC-VIEW-*)
    // ============================================================
    /// [TRC-VIEW-001] Role name not in the closed role set
    #[error("[TRC-VIEW-001] Unknown role: {name}")]
    UnknownRole { name: String },

    // ============================================================
    // Custody Errors (TRC-CUSTODY-*)
    // ============================================================
    /// [TRC-CUSTODY-001] Custody moves one way only: farmer -> processor -> exporter
    #[error("[TRC-CUSTODY-001] Custody cannot move from {from} to {to}")]
    CustodyRegression { from: String, to: String },

    // ============================================================
    // Weight Errors (TRC-WEIGHT-*)
    // ============================================================
    /// [TRC-WEIGHT-001] Received quantities do not match submission
    #[error("[TRC-WEIGHT-001] Reconciliation mismatch: submitted {submitted}, received {received}")]
    ReconciliationMismatch { submitted: String, received: String },

    /// [TRC-WEIGHT-002] Aggregate weight exceeds the sum of its parts
    #[error("[TRC-WEIGHT-002] Aggregate weight {aggregate} exceeds sum of parts {parts}")]
    WeightExceedsParts { aggregate: Decimal, parts: Decimal },

    // ============================================================
    // General Errors
    // ============================================================
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Validation error
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl TraceError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        TraceError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        TraceError::Validation {
            message: message.into(),
        }
    }

    /// Create an unknown role error
    pub fn unknown_role(name: impl Into<String>) -> Self {
        TraceError::UnknownRole { name: name.into() }
    }

    /// Stable registry code for this error, if it has one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            TraceError::IllegalTransition { .. } => Some("TRC-FLOW-001"),
            TraceError::UnknownTransition { .. } => Some("TRC-FLOW-002"),
            TraceError::RoleNotPermitted { .. } => Some("TRC-FLOW-003"),
            TraceError::UnknownEdge { .. } => Some("TRC-GRAPH-001"),
            TraceError::ConflictingOwnership { .. } => Some("TRC-GRAPH-002"),
            TraceError::UnknownRole { .. } => Some("TRC-VIEW-001"),
            TraceError::CustodyRegression { .. } => Some("TRC-CUSTODY-001"),
            TraceError::ReconciliationMismatch { .. } => Some("TRC-WEIGHT-001"),
            TraceError::WeightExceedsParts { .. } => Some("TRC-WEIGHT-002"),
            TraceError::NotFound { .. } | TraceError::Validation { .. } => None,
        }
    }
}
