//! Store Error Types

use thiserror::Error;
use trace_core::TraceError;

/// Store Result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage layer error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// Duplicate entity
    #[error("Duplicate entity: {entity_type} with id {id}")]
    Duplicate { entity_type: String, id: String },

    /// Domain rule violation (workflow, custody, graph, weights)
    #[error(transparent)]
    Domain(#[from] TraceError),

    /// Invalid entity state for the requested operation
    #[error("Invalid entity state: {message}")]
    InvalidState { message: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Create a duplicate error
    pub fn duplicate(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}
