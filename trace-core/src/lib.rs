//! Coffee Supply-Chain Traceability - Domain Core
//!
//! Pure domain model behind the traceability platform: the entity
//! registry, the status workflow, the aggregation graph and the
//! role-scoped view resolver. No I/O lives here; storage and transport
//! build on top.
//!
//! # Supply chain
//!
//! ```text
//! Farm ──* Harvest ──* Batch ──* Lot ──* Consignment
//!  farmer      farmer     farmer -> processor -> exporter (custody)
//! ```
//!
//! # Components
//!
//! - [`types`]: the five traceable entities and their field shapes
//! - [`workflow`]: table-driven status state machine
//!   ([`workflow::can_transition`] is the single decision point for
//!   every status change)
//! - [`graph`]: aggregation edges, lazy child resolution, exclusive
//!   child ownership
//! - [`view`]: role -> dashboard query resolution ([`view::scope_for`])
//! - [`reconcile`]: submission vs receipt weight reconciliation
//! - [`custody`]: one-way farmer -> processor -> exporter custody chain
//!
//! # Invariants
//!
//! | Invariant | Requirement |
//! |-----------|-------------|
//! | Monotonic status | transitions follow each entity's sequence; only terminal rejection short-circuits |
//! | One-way custody | a later-stage actor is never assigned before the earlier stage completes |
//! | Exclusive aggregation | a child id appears in exactly one parent's child list at a time |
//! | Weight conservation | an aggregate never claims more weight than the sum of its parts |
//! | Tombstones | `is_deleted` hides a row from active listings but never removes it |
//!
//! Every decision function fails closed on unknown entity kinds, status
//! strings or role names so consumers survive backend schema drift.

pub mod custody;
pub mod error;
pub mod graph;
pub mod reconcile;
pub mod types;
pub mod view;
pub mod workflow;

pub use custody::{Custody, CustodyStage};
pub use error::{TraceError, TraceResult};
pub use graph::{child_kind, resolve_children, ChildIds, OwnershipLedger};
pub use reconcile::{reconcile, Reconciliation, ReceiptRecord, SubmissionRecord};
pub use types::{
    Actor, AnchorStatus, Batch, BatchId, BatchStatus, ChainAnchor, Consignment, ConsignmentId,
    ConsignmentStatus, EntityKind, Farm, FarmId, FarmStatus, GeoPoint, GeoShape, Harvest,
    HarvestId, HarvestStatus, KycStatus, Lot, LotId, LotStatus, Role, ShippingMethod, UserId,
    UserProfile, WeightKg,
};
pub use view::{scope_for, scope_for_name, EntityQuery, OwnerScope, StatusFilter, ViewSpec};
pub use workflow::{can_transition, check_transition, legal_targets};
