//! Entity Registry
//!
//! The five traceable entities (Farm, Harvest, Batch, Lot, Consignment),
//! their field shapes, and the shared id/role/anchor types.

pub mod batch;
pub mod common;
pub mod consignment;
pub mod farm;
pub mod harvest;
pub mod lot;
pub mod user;

pub use batch::{Batch, BatchStatus};
pub use common::{
    AnchorStatus, BatchId, ChainAnchor, ConsignmentId, EntityKind, FarmId, GeoPoint, GeoShape,
    HarvestId, LotId, Role, UserId, WeightKg,
};
pub use consignment::{Consignment, ConsignmentStatus, ShippingMethod};
pub use farm::{Farm, FarmStatus};
pub use harvest::{Harvest, HarvestStatus};
pub use lot::{Lot, LotStatus};
pub use user::{Actor, KycStatus, UserProfile};
