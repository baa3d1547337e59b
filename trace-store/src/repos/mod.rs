//! Repository Traits
//!
//! One trait per aggregate. Every mutating method takes the acting
//! identity explicitly; transitions are guarded by the core workflow
//! table before anything is written.

pub mod memory;

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use trace_core::reconcile::ReceiptRecord;
use trace_core::types::{
    Actor, Batch, Consignment, Farm, Harvest, KycStatus, Lot, UserProfile,
};
use trace_core::WeightKg;

pub use memory::MemoryStore;

/// Farm repository
#[async_trait]
pub trait FarmRepository: Send + Sync {
    /// Register a new farm (farmer-owned, starts pending)
    async fn create_farm(&self, actor: &Actor, farm: Farm) -> StoreResult<Farm>;

    /// Get a farm by id, tombstoned rows included (audit/history)
    async fn get_farm(&self, id: &str) -> StoreResult<Option<Farm>>;

    /// Get a farm by id, error if missing
    async fn get_farm_required(&self, id: &str) -> StoreResult<Farm> {
        self.get_farm(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Farm", id))
    }

    /// List active (non-tombstoned) farms, optionally scoped to an owner
    async fn list_farms(&self, owner: Option<&str>) -> StoreResult<Vec<Farm>>;

    /// Apply a status transition guarded by the workflow table
    async fn transition_farm(&self, actor: &Actor, id: &str, target: &str) -> StoreResult<Farm>;

    /// Set the tombstone; the row stays fetchable by id
    async fn soft_delete_farm(&self, actor: &Actor, id: &str) -> StoreResult<()>;
}

/// Harvest repository
#[async_trait]
pub trait HarvestRepository: Send + Sync {
    async fn create_harvest(&self, actor: &Actor, harvest: Harvest) -> StoreResult<Harvest>;

    async fn get_harvest(&self, id: &str) -> StoreResult<Option<Harvest>>;

    async fn get_harvest_required(&self, id: &str) -> StoreResult<Harvest> {
        self.get_harvest(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Harvest", id))
    }

    /// List active harvests, optionally scoped to one farm
    async fn list_harvests(&self, farm_id: Option<&str>) -> StoreResult<Vec<Harvest>>;

    async fn transition_harvest(
        &self,
        actor: &Actor,
        id: &str,
        target: &str,
    ) -> StoreResult<Harvest>;

    async fn soft_delete_harvest(&self, actor: &Actor, id: &str) -> StoreResult<()>;
}

/// Batch repository
#[async_trait]
pub trait BatchRepository: Send + Sync {
    /// Submit a batch. Attaches its harvests exclusively (a harvest in
    /// another batch is a conflict) and checks the claimed weight
    /// against the harvests' submitted weights.
    async fn create_batch(&self, actor: &Actor, batch: Batch) -> StoreResult<Batch>;

    async fn get_batch(&self, id: &str) -> StoreResult<Option<Batch>>;

    async fn get_batch_required(&self, id: &str) -> StoreResult<Batch> {
        self.get_batch(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Batch", id))
    }

    /// List active batches, optionally scoped to the submitting farmer
    /// or the current custody holder
    async fn list_batches(&self, holder: Option<&str>) -> StoreResult<Vec<Batch>>;

    /// Apply a status transition. `submitted -> received` takes the
    /// receipt quantities, runs reconciliation and transfers custody to
    /// the receiving processor; `processed -> exported` transfers
    /// custody to the exporter.
    async fn transition_batch(
        &self,
        actor: &Actor,
        id: &str,
        target: &str,
        receipt: Option<ReceiptRecord>,
    ) -> StoreResult<Batch>;

    async fn soft_delete_batch(&self, actor: &Actor, id: &str) -> StoreResult<()>;
}

/// Lot repository
#[async_trait]
pub trait LotRepository: Send + Sync {
    /// Create a lot from processed batches; batches attach exclusively
    async fn create_lot(&self, actor: &Actor, lot: Lot) -> StoreResult<Lot>;

    async fn get_lot(&self, id: &str) -> StoreResult<Option<Lot>>;

    async fn get_lot_required(&self, id: &str) -> StoreResult<Lot> {
        self.get_lot(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Lot", id))
    }

    async fn list_lots(&self, processor: Option<&str>) -> StoreResult<Vec<Lot>>;

    async fn transition_lot(&self, actor: &Actor, id: &str, target: &str) -> StoreResult<Lot>;

    /// Record receipt of the lot by its exporter
    async fn record_lot_receipt(
        &self,
        actor: &Actor,
        id: &str,
        received_weight_kg: WeightKg,
    ) -> StoreResult<Lot>;

    async fn soft_delete_lot(&self, actor: &Actor, id: &str) -> StoreResult<()>;
}

/// Consignment repository
#[async_trait]
pub trait ConsignmentRepository: Send + Sync {
    /// Assemble a consignment from exported-ready lots; lots attach
    /// exclusively
    async fn create_consignment(
        &self,
        actor: &Actor,
        consignment: Consignment,
    ) -> StoreResult<Consignment>;

    async fn get_consignment(&self, id: &str) -> StoreResult<Option<Consignment>>;

    async fn get_consignment_required(&self, id: &str) -> StoreResult<Consignment> {
        self.get_consignment(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Consignment", id))
    }

    async fn list_consignments(&self, exporter: Option<&str>) -> StoreResult<Vec<Consignment>>;

    async fn transition_consignment(
        &self,
        actor: &Actor,
        id: &str,
        target: &str,
    ) -> StoreResult<Consignment>;
}

/// User repository
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn upsert_user(&self, profile: UserProfile) -> StoreResult<UserProfile>;

    async fn get_user(&self, id: &str) -> StoreResult<Option<UserProfile>>;

    async fn get_user_required(&self, id: &str) -> StoreResult<UserProfile> {
        self.get_user(id)
            .await?
            .ok_or_else(|| StoreError::not_found("User", id))
    }

    /// Review a user's KYC submission (extension worker only)
    async fn review_kyc(
        &self,
        actor: &Actor,
        user_id: &str,
        target: KycStatus,
    ) -> StoreResult<UserProfile>;
}
