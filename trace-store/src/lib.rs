//! Traceability Storage Layer
//!
//! Repository traits plus an in-memory datastore. All domain guards run
//! here: workflow transitions, custody transfers, exclusive child
//! ownership, weight conservation and soft deletion, with every
//! mutation appended to a digest-chained audit log.

pub mod audit;
pub mod error;
pub mod repos;

pub use audit::{AuditAction, AuditLog, AuditRecord};
pub use error::{StoreError, StoreResult};
pub use repos::memory::{Dashboard, DashboardSection, MemoryStore};
pub use repos::{
    BatchRepository, ConsignmentRepository, FarmRepository, HarvestRepository, LotRepository,
    UserRepository,
};
