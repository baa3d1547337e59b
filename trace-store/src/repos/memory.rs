//! In-Memory Datastore
//!
//! `tokio::sync::RwLock`-guarded maps behind the repository traits. A
//! database-backed implementation can slot in behind the same seam;
//! the workflow/custody/graph guards live here either way, not in the
//! transport layer.

use crate::audit::{AuditAction, AuditLog, AuditRecord};
use crate::error::{StoreError, StoreResult};
use crate::repos::{
    BatchRepository, ConsignmentRepository, FarmRepository, HarvestRepository, LotRepository,
    UserRepository,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use trace_core::custody::CustodyStage;
use trace_core::reconcile::{self, ReceiptRecord, SubmissionRecord};
use trace_core::types::{
    Actor, Batch, Consignment, EntityKind, Farm, Harvest, KycStatus, Lot, Role, UserProfile,
};
use trace_core::view::{scope_for, OwnerScope};
use trace_core::{check_transition, OwnershipLedger, TraceError, WeightKg};

/// One dashboard section: the rows one role-scoped query produced
#[derive(Clone, Debug, Serialize)]
pub struct DashboardSection {
    pub kind: EntityKind,
    pub count: usize,
    pub items: serde_json::Value,
}

/// A resolved role-scoped dashboard
#[derive(Clone, Debug, Serialize)]
pub struct Dashboard {
    pub role: Role,
    pub read_only: bool,
    pub sections: Vec<DashboardSection>,
}

/// In-memory datastore
#[derive(Default)]
pub struct MemoryStore {
    farms: RwLock<HashMap<String, Farm>>,
    harvests: RwLock<HashMap<String, Harvest>>,
    batches: RwLock<HashMap<String, Batch>>,
    lots: RwLock<HashMap<String, Lot>>,
    consignments: RwLock<HashMap<String, Consignment>>,
    users: RwLock<HashMap<String, UserProfile>>,
    /// harvest -> owning batch
    harvest_owners: RwLock<OwnershipLedger>,
    /// batch -> owning lot
    batch_owners: RwLock<OwnershipLedger>,
    /// lot -> owning consignment
    lot_owners: RwLock<OwnershipLedger>,
    audit: RwLock<AuditLog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn record(
        &self,
        actor: &Actor,
        action: AuditAction,
        kind: EntityKind,
        entity_id: &str,
        detail: Option<String>,
    ) {
        let mut audit = self.audit.write().await;
        audit.append(actor, action, kind.as_str(), entity_id, detail);
    }

    /// Most recent audit records, newest first
    pub async fn audit_recent(&self, limit: usize) -> Vec<AuditRecord> {
        self.audit.read().await.recent(limit)
    }

    /// Verify the audit digest chain
    pub async fn audit_verified(&self) -> bool {
        self.audit.read().await.verify_chain()
    }

    /// Resolve the signed-in actor's dashboard: run every query of the
    /// role's view spec against the store.
    pub async fn dashboard(&self, actor: &Actor) -> StoreResult<Dashboard> {
        let spec = scope_for(actor.role);
        let user = actor.user_id.as_str();
        let mut sections = Vec::with_capacity(spec.queries.len());

        for q in &spec.queries {
            let items: serde_json::Value = match q.kind {
                EntityKind::Farm => {
                    let farms = self.farms.read().await;
                    to_items(farms.values().filter(|f| {
                        f.is_active()
                            && matches_scope(q.scope, f.owner_id.as_str() == user)
                            && q.statuses.matches(f.status.as_str())
                    }))?
                }
                EntityKind::Harvest => {
                    let own_farms: Vec<String> = {
                        let farms = self.farms.read().await;
                        farms
                            .values()
                            .filter(|f| f.owner_id.as_str() == user)
                            .map(|f| f.farm_id.as_str().to_string())
                            .collect()
                    };
                    let harvests = self.harvests.read().await;
                    to_items(harvests.values().filter(|h| {
                        h.is_active()
                            && matches_scope(q.scope, own_farms.contains(&h.farm_id.0))
                            && q.statuses.matches(h.status.as_str())
                    }))?
                }
                EntityKind::Batch => {
                    let batches = self.batches.read().await;
                    to_items(batches.values().filter(|b| {
                        let owned = match q.scope {
                            OwnerScope::Own => b.farmer_id.as_str() == user,
                            OwnerScope::AssignedTo => b.custody.holder.as_str() == user,
                            OwnerScope::All => true,
                        };
                        b.is_active() && owned && q.statuses.matches(b.status.as_str())
                    }))?
                }
                EntityKind::Lot => {
                    let lots = self.lots.read().await;
                    to_items(lots.values().filter(|l| {
                        let owned = match q.scope {
                            OwnerScope::Own => l.processor_id.as_str() == user,
                            OwnerScope::AssignedTo => {
                                l.exporter_id.as_ref().map(|e| e.as_str()) == Some(user)
                            }
                            OwnerScope::All => true,
                        };
                        l.is_active() && owned && q.statuses.matches(l.status.as_str())
                    }))?
                }
                EntityKind::Consignment => {
                    let consignments = self.consignments.read().await;
                    to_items(consignments.values().filter(|c| {
                        c.is_active()
                            && matches_scope(q.scope, c.exporter_id.as_str() == user)
                            && q.statuses.matches(c.status.as_str())
                    }))?
                }
            };
            let count = items.as_array().map(|a| a.len()).unwrap_or(0);
            sections.push(DashboardSection {
                kind: q.kind,
                count,
                items,
            });
        }

        Ok(Dashboard {
            role: spec.role,
            read_only: spec.read_only,
            sections,
        })
    }
}

fn matches_scope(scope: OwnerScope, is_owner: bool) -> bool {
    match scope {
        OwnerScope::Own | OwnerScope::AssignedTo => is_owner,
        OwnerScope::All => true,
    }
}

fn to_items<'a, T, I>(rows: I) -> StoreResult<serde_json::Value>
where
    T: Serialize + 'a,
    I: Iterator<Item = &'a T>,
{
    serde_json::to_value(rows.collect::<Vec<_>>())
        .map_err(|e| StoreError::Internal(e.to_string()))
}

fn guard(kind: EntityKind, current: &str, target: &str, actor: &Actor) -> StoreResult<()> {
    check_transition(kind.as_str(), current, target, actor.role)?;
    Ok(())
}

// ============================================================
// Farm
// ============================================================

#[async_trait]
impl FarmRepository for MemoryStore {
    async fn create_farm(&self, actor: &Actor, farm: Farm) -> StoreResult<Farm> {
        let mut farms = self.farms.write().await;
        let id = farm.farm_id.as_str().to_string();
        if farms.contains_key(&id) {
            return Err(StoreError::duplicate("Farm", id));
        }
        farms.insert(id.clone(), farm.clone());
        drop(farms);
        self.record(actor, AuditAction::Created, EntityKind::Farm, &id, None)
            .await;
        Ok(farm)
    }

    async fn get_farm(&self, id: &str) -> StoreResult<Option<Farm>> {
        Ok(self.farms.read().await.get(id).cloned())
    }

    async fn list_farms(&self, owner: Option<&str>) -> StoreResult<Vec<Farm>> {
        let farms = self.farms.read().await;
        Ok(farms
            .values()
            .filter(|f| f.is_active() && owner.map_or(true, |o| f.owner_id.as_str() == o))
            .cloned()
            .collect())
    }

    async fn transition_farm(&self, actor: &Actor, id: &str, target: &str) -> StoreResult<Farm> {
        let mut farms = self.farms.write().await;
        let farm = farms
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Farm", id))?;
        let current = farm.status.as_str();
        guard(EntityKind::Farm, current, target, actor)?;
        let detail = format!("{} -> {}", current, target);
        farm.status = trace_core::FarmStatus::parse(target).ok_or_else(|| {
            StoreError::Domain(TraceError::UnknownTransition {
                kind: "farm".into(),
                from: current.into(),
                to: target.into(),
            })
        })?;
        farm.updated_at = Utc::now();
        let updated = farm.clone();
        drop(farms);
        self.record(
            actor,
            AuditAction::Transitioned,
            EntityKind::Farm,
            id,
            Some(detail),
        )
        .await;
        Ok(updated)
    }

    async fn soft_delete_farm(&self, actor: &Actor, id: &str) -> StoreResult<()> {
        let mut farms = self.farms.write().await;
        let farm = farms
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Farm", id))?;
        farm.is_deleted = true;
        farm.updated_at = Utc::now();
        drop(farms);
        self.record(actor, AuditAction::SoftDeleted, EntityKind::Farm, id, None)
            .await;
        Ok(())
    }
}

// ============================================================
// Harvest
// ============================================================

#[async_trait]
impl HarvestRepository for MemoryStore {
    async fn create_harvest(&self, actor: &Actor, harvest: Harvest) -> StoreResult<Harvest> {
        // The parent farm must exist and be active
        let farms = self.farms.read().await;
        let farm = farms
            .get(harvest.farm_id.as_str())
            .ok_or_else(|| StoreError::not_found("Farm", harvest.farm_id.as_str()))?;
        if !farm.is_active() {
            return Err(StoreError::invalid_state(format!(
                "Farm {} is deleted",
                farm.farm_id
            )));
        }
        drop(farms);

        let mut harvests = self.harvests.write().await;
        let id = harvest.harvest_id.as_str().to_string();
        if harvests.contains_key(&id) {
            return Err(StoreError::duplicate("Harvest", id));
        }
        harvests.insert(id.clone(), harvest.clone());
        drop(harvests);
        self.record(actor, AuditAction::Created, EntityKind::Harvest, &id, None)
            .await;
        Ok(harvest)
    }

    async fn get_harvest(&self, id: &str) -> StoreResult<Option<Harvest>> {
        Ok(self.harvests.read().await.get(id).cloned())
    }

    async fn list_harvests(&self, farm_id: Option<&str>) -> StoreResult<Vec<Harvest>> {
        let harvests = self.harvests.read().await;
        Ok(harvests
            .values()
            .filter(|h| h.is_active() && farm_id.map_or(true, |f| h.farm_id.as_str() == f))
            .cloned()
            .collect())
    }

    async fn transition_harvest(
        &self,
        actor: &Actor,
        id: &str,
        target: &str,
    ) -> StoreResult<Harvest> {
        let mut harvests = self.harvests.write().await;
        let harvest = harvests
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Harvest", id))?;
        let current = harvest.status.as_str();
        guard(EntityKind::Harvest, current, target, actor)?;
        let detail = format!("{} -> {}", current, target);
        harvest.status = trace_core::HarvestStatus::parse(target).ok_or_else(|| {
            StoreError::Domain(TraceError::UnknownTransition {
                kind: "harvest".into(),
                from: current.into(),
                to: target.into(),
            })
        })?;
        harvest.updated_at = Utc::now();
        let updated = harvest.clone();
        drop(harvests);
        self.record(
            actor,
            AuditAction::Transitioned,
            EntityKind::Harvest,
            id,
            Some(detail),
        )
        .await;
        Ok(updated)
    }

    async fn soft_delete_harvest(&self, actor: &Actor, id: &str) -> StoreResult<()> {
        let mut harvests = self.harvests.write().await;
        let harvest = harvests
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Harvest", id))?;
        harvest.is_deleted = true;
        harvest.updated_at = Utc::now();
        drop(harvests);
        self.record(actor, AuditAction::SoftDeleted, EntityKind::Harvest, id, None)
            .await;
        Ok(())
    }
}

// ============================================================
// Batch
// ============================================================

#[async_trait]
impl BatchRepository for MemoryStore {
    async fn create_batch(&self, actor: &Actor, batch: Batch) -> StoreResult<Batch> {
        // Every constituent harvest must exist and be active; collect
        // submitted weights for the conservation check.
        let mut part_weights: Vec<WeightKg> = Vec::with_capacity(batch.harvest_ids.len());
        {
            let harvests = self.harvests.read().await;
            for hid in &batch.harvest_ids {
                let harvest = harvests
                    .get(hid.as_str())
                    .ok_or_else(|| StoreError::not_found("Harvest", hid.as_str()))?;
                if !harvest.is_active() {
                    return Err(StoreError::invalid_state(format!(
                        "Harvest {} is deleted",
                        hid
                    )));
                }
                part_weights.push(harvest.weight_kg);
            }
        }
        reconcile::check_aggregate_weight(batch.total_weight_kg, &part_weights)
            .map_err(StoreError::Domain)?;

        // Exclusive aggregation: a harvest belongs to at most one batch
        {
            let mut ledger = self.harvest_owners.write().await;
            for hid in &batch.harvest_ids {
                ledger.attach(hid.as_str(), batch.batch_id.as_str())?;
            }
        }

        let mut batches = self.batches.write().await;
        let id = batch.batch_id.as_str().to_string();
        if batches.contains_key(&id) {
            return Err(StoreError::duplicate("Batch", id));
        }
        batches.insert(id.clone(), batch.clone());
        drop(batches);
        self.record(actor, AuditAction::Created, EntityKind::Batch, &id, None)
            .await;
        Ok(batch)
    }

    async fn get_batch(&self, id: &str) -> StoreResult<Option<Batch>> {
        Ok(self.batches.read().await.get(id).cloned())
    }

    async fn list_batches(&self, holder: Option<&str>) -> StoreResult<Vec<Batch>> {
        let batches = self.batches.read().await;
        Ok(batches
            .values()
            .filter(|b| {
                b.is_active()
                    && holder.map_or(true, |h| {
                        b.farmer_id.as_str() == h || b.custody.holder.as_str() == h
                    })
            })
            .cloned()
            .collect())
    }

    async fn transition_batch(
        &self,
        actor: &Actor,
        id: &str,
        target: &str,
        receipt: Option<ReceiptRecord>,
    ) -> StoreResult<Batch> {
        let mut batches = self.batches.write().await;
        let batch = batches
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Batch", id))?;
        let current = batch.status.as_str();
        guard(EntityKind::Batch, current, target, actor)?;
        let detail = format!("{} -> {}", current, target);

        match target {
            "received" => {
                // Custody moves to the receiving processor
                batch
                    .custody
                    .transfer_to(CustodyStage::Processor, actor.user_id.clone())
                    .map_err(StoreError::Domain)?;
                if let Some(receipt) = receipt {
                    let outcome = reconcile::reconcile(
                        SubmissionRecord {
                            bags: batch.number_of_bags,
                            weight_kg: batch.total_weight_kg,
                        },
                        receipt,
                    );
                    batch.number_of_bags_received = Some(receipt.bags);
                    batch.received_weight_kg = Some(receipt.weight_kg);
                    batch.reconciliation_flagged = outcome.flagged;
                    if outcome.flagged {
                        tracing::warn!(
                            batch_id = %batch.batch_id,
                            bag_delta = outcome.bag_delta,
                            "batch receipt disagrees with submission"
                        );
                    }
                }
            }
            "exported" => {
                batch
                    .custody
                    .transfer_to(CustodyStage::Exporter, actor.user_id.clone())
                    .map_err(StoreError::Domain)?;
            }
            _ => {}
        }

        batch.status = trace_core::BatchStatus::parse(target).ok_or_else(|| {
            StoreError::Domain(TraceError::UnknownTransition {
                kind: "batch".into(),
                from: current.into(),
                to: target.into(),
            })
        })?;
        batch.updated_at = Utc::now();
        let updated = batch.clone();
        drop(batches);
        self.record(
            actor,
            AuditAction::Transitioned,
            EntityKind::Batch,
            id,
            Some(detail),
        )
        .await;
        Ok(updated)
    }

    async fn soft_delete_batch(&self, actor: &Actor, id: &str) -> StoreResult<()> {
        let mut batches = self.batches.write().await;
        let batch = batches
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Batch", id))?;
        batch.is_deleted = true;
        batch.updated_at = Utc::now();
        drop(batches);
        self.record(actor, AuditAction::SoftDeleted, EntityKind::Batch, id, None)
            .await;
        Ok(())
    }
}

// ============================================================
// Lot
// ============================================================

#[async_trait]
impl LotRepository for MemoryStore {
    async fn create_lot(&self, actor: &Actor, lot: Lot) -> StoreResult<Lot> {
        let mut part_weights: Vec<WeightKg> = Vec::with_capacity(lot.batch_ids.len());
        {
            let batches = self.batches.read().await;
            for bid in &lot.batch_ids {
                let batch = batches
                    .get(bid.as_str())
                    .ok_or_else(|| StoreError::not_found("Batch", bid.as_str()))?;
                if !batch.is_active() {
                    return Err(StoreError::invalid_state(format!("Batch {} is deleted", bid)));
                }
                part_weights.push(batch.total_weight_kg);
            }
        }
        reconcile::check_aggregate_weight(lot.total_output_weight_kg, &part_weights)
            .map_err(StoreError::Domain)?;

        {
            let mut ledger = self.batch_owners.write().await;
            for bid in &lot.batch_ids {
                ledger.attach(bid.as_str(), lot.lot_id.as_str())?;
            }
        }

        let mut lots = self.lots.write().await;
        let id = lot.lot_id.as_str().to_string();
        if lots.contains_key(&id) {
            return Err(StoreError::duplicate("Lot", id));
        }
        lots.insert(id.clone(), lot.clone());
        drop(lots);
        self.record(actor, AuditAction::Created, EntityKind::Lot, &id, None)
            .await;
        Ok(lot)
    }

    async fn get_lot(&self, id: &str) -> StoreResult<Option<Lot>> {
        Ok(self.lots.read().await.get(id).cloned())
    }

    async fn list_lots(&self, processor: Option<&str>) -> StoreResult<Vec<Lot>> {
        let lots = self.lots.read().await;
        Ok(lots
            .values()
            .filter(|l| l.is_active() && processor.map_or(true, |p| l.processor_id.as_str() == p))
            .cloned()
            .collect())
    }

    async fn transition_lot(&self, actor: &Actor, id: &str, target: &str) -> StoreResult<Lot> {
        let mut lots = self.lots.write().await;
        let lot = lots
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Lot", id))?;
        let current = lot.status.as_str();
        guard(EntityKind::Lot, current, target, actor)?;
        let detail = format!("{} -> {}", current, target);

        // Approving the export assigns the lot to the approving exporter
        if target == "export_approved" && actor.role == Role::Exporter {
            lot.exporter_id = Some(actor.user_id.clone());
        }

        lot.status = trace_core::LotStatus::parse(target).ok_or_else(|| {
            StoreError::Domain(TraceError::UnknownTransition {
                kind: "lot".into(),
                from: current.into(),
                to: target.into(),
            })
        })?;
        lot.updated_at = Utc::now();
        let updated = lot.clone();
        drop(lots);
        self.record(
            actor,
            AuditAction::Transitioned,
            EntityKind::Lot,
            id,
            Some(detail),
        )
        .await;
        Ok(updated)
    }

    async fn record_lot_receipt(
        &self,
        actor: &Actor,
        id: &str,
        received_weight_kg: WeightKg,
    ) -> StoreResult<Lot> {
        let mut lots = self.lots.write().await;
        let lot = lots
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Lot", id))?;
        if lot.exporter_id.as_ref() != Some(&actor.user_id) {
            return Err(StoreError::invalid_state(format!(
                "Lot {} is not assigned to {}",
                id, actor.user_id
            )));
        }
        lot.received_weight_kg = Some(received_weight_kg);
        lot.date_received = Some(Utc::now());
        lot.updated_at = Utc::now();
        Ok(lot.clone())
    }

    async fn soft_delete_lot(&self, actor: &Actor, id: &str) -> StoreResult<()> {
        let mut lots = self.lots.write().await;
        let lot = lots
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Lot", id))?;
        lot.is_deleted = true;
        lot.updated_at = Utc::now();
        drop(lots);
        self.record(actor, AuditAction::SoftDeleted, EntityKind::Lot, id, None)
            .await;
        Ok(())
    }
}

// ============================================================
// Consignment
// ============================================================

#[async_trait]
impl ConsignmentRepository for MemoryStore {
    async fn create_consignment(
        &self,
        actor: &Actor,
        consignment: Consignment,
    ) -> StoreResult<Consignment> {
        {
            let lots = self.lots.read().await;
            for lid in &consignment.lot_ids {
                let lot = lots
                    .get(lid.as_str())
                    .ok_or_else(|| StoreError::not_found("Lot", lid.as_str()))?;
                if !lot.is_active() {
                    return Err(StoreError::invalid_state(format!("Lot {} is deleted", lid)));
                }
            }
        }

        {
            let mut ledger = self.lot_owners.write().await;
            for lid in &consignment.lot_ids {
                ledger.attach(lid.as_str(), consignment.consignment_id.as_str())?;
            }
        }

        let mut consignments = self.consignments.write().await;
        let id = consignment.consignment_id.as_str().to_string();
        if consignments.contains_key(&id) {
            return Err(StoreError::duplicate("Consignment", id));
        }
        consignments.insert(id.clone(), consignment.clone());
        drop(consignments);
        self.record(
            actor,
            AuditAction::Created,
            EntityKind::Consignment,
            &id,
            None,
        )
        .await;
        Ok(consignment)
    }

    async fn get_consignment(&self, id: &str) -> StoreResult<Option<Consignment>> {
        Ok(self.consignments.read().await.get(id).cloned())
    }

    async fn list_consignments(&self, exporter: Option<&str>) -> StoreResult<Vec<Consignment>> {
        let consignments = self.consignments.read().await;
        Ok(consignments
            .values()
            .filter(|c| c.is_active() && exporter.map_or(true, |e| c.exporter_id.as_str() == e))
            .cloned()
            .collect())
    }

    async fn transition_consignment(
        &self,
        actor: &Actor,
        id: &str,
        target: &str,
    ) -> StoreResult<Consignment> {
        let mut consignments = self.consignments.write().await;
        let consignment = consignments
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Consignment", id))?;
        let current = consignment.status.as_str();
        guard(EntityKind::Consignment, current, target, actor)?;
        let detail = format!("{} -> {}", current, target);

        consignment.status = trace_core::ConsignmentStatus::parse(target).ok_or_else(|| {
            StoreError::Domain(TraceError::UnknownTransition {
                kind: "consignment".into(),
                from: current.into(),
                to: target.into(),
            })
        })?;
        if consignment.export_date.is_none() && target == "exported" {
            consignment.export_date = Some(Utc::now().date_naive());
        }
        consignment.updated_at = Utc::now();
        let updated = consignment.clone();
        drop(consignments);
        self.record(
            actor,
            AuditAction::Transitioned,
            EntityKind::Consignment,
            id,
            Some(detail),
        )
        .await;
        Ok(updated)
    }
}

// ============================================================
// User / KYC
// ============================================================

#[async_trait]
impl UserRepository for MemoryStore {
    async fn upsert_user(&self, profile: UserProfile) -> StoreResult<UserProfile> {
        let mut users = self.users.write().await;
        users.insert(profile.user_id.as_str().to_string(), profile.clone());
        Ok(profile)
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<UserProfile>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn review_kyc(
        &self,
        actor: &Actor,
        user_id: &str,
        target: KycStatus,
    ) -> StoreResult<UserProfile> {
        if actor.role != Role::ExtensionWorker {
            return Err(StoreError::Domain(TraceError::RoleNotPermitted {
                kind: "kyc".into(),
                from: "pending".into(),
                to: target.as_str().into(),
                role: actor.role.as_str().into(),
            }));
        }
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| StoreError::not_found("User", user_id))?;
        if user.kyc_status != KycStatus::Pending {
            return Err(StoreError::invalid_state(format!(
                "KYC for {} already reviewed ({})",
                user_id,
                user.kyc_status.as_str()
            )));
        }
        user.kyc_status = target;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use trace_core::types::{GeoPoint, GeoShape, UserId};

    fn farmer() -> Actor {
        Actor::new(UserId::new("user:farmer1"), Role::Farmer)
    }

    fn processor() -> Actor {
        Actor::new(UserId::new("user:proc1"), Role::Processor)
    }

    fn exporter() -> Actor {
        Actor::new(UserId::new("user:exp1"), Role::Exporter)
    }

    fn extension() -> Actor {
        Actor::new(UserId::new("user:ext1"), Role::ExtensionWorker)
    }

    fn point() -> GeoShape {
        GeoShape::Point {
            point: GeoPoint { lat: -1.9, lng: 30.1 },
        }
    }

    async fn seed_farm(store: &MemoryStore) -> Farm {
        let farm = Farm::new(farmer().user_id, "Nyamasheke", point());
        store.create_farm(&farmer(), farm).await.unwrap()
    }

    async fn seed_harvest(store: &MemoryStore, farm: &Farm, weight: i64) -> Harvest {
        let harvest = Harvest::new(
            farm.farm_id.clone(),
            "bourbon",
            Decimal::from(weight),
            chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        );
        store.create_harvest(&farmer(), harvest).await.unwrap()
    }

    #[tokio::test]
    async fn test_farm_approval_flow() {
        let store = MemoryStore::new();
        let farm = seed_farm(&store).await;

        let approved = store
            .transition_farm(&extension(), farm.farm_id.as_str(), "approved")
            .await
            .unwrap();
        assert_eq!(approved.status, trace_core::FarmStatus::Approved);

        // A farmer-initiated approve on an already-approved farm is an
        // illegal transition, not a role failure: the edge is gone.
        let err = store
            .transition_farm(&farmer(), farm.farm_id.as_str(), "approved")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(TraceError::IllegalTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_farmer_cannot_approve_pending_farm() {
        let store = MemoryStore::new();
        let farm = seed_farm(&store).await;
        let err = store
            .transition_farm(&farmer(), farm.farm_id.as_str(), "approved")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(TraceError::RoleNotPermitted { .. })
        ));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_listing_but_not_get() {
        let store = MemoryStore::new();
        let farm = seed_farm(&store).await;
        store
            .soft_delete_farm(&farmer(), farm.farm_id.as_str())
            .await
            .unwrap();

        assert!(store.list_farms(None).await.unwrap().is_empty());
        let fetched = store.get_farm(farm.farm_id.as_str()).await.unwrap().unwrap();
        assert!(fetched.is_deleted);
    }

    #[tokio::test]
    async fn test_batch_receipt_reconciliation_flags_shortfall() {
        let store = MemoryStore::new();
        let farm = seed_farm(&store).await;
        let harvest = seed_harvest(&store, &farm, 600).await;

        let batch = Batch::new(
            farmer().user_id,
            vec![harvest.harvest_id.clone()],
            Decimal::from(600),
            10,
        );
        let batch = store.create_batch(&farmer(), batch).await.unwrap();

        // Processor receives 8 of 10 bags
        let received = store
            .transition_batch(
                &processor(),
                batch.batch_id.as_str(),
                "received",
                Some(ReceiptRecord {
                    bags: 8,
                    weight_kg: Decimal::from(480),
                }),
            )
            .await
            .unwrap();
        assert!(received.reconciliation_flagged);
        assert_eq!(received.number_of_bags_received, Some(8));
        assert_eq!(received.custody.stage, CustodyStage::Processor);
        assert_eq!(received.custody.holder, processor().user_id);
    }

    #[tokio::test]
    async fn test_batch_weight_cannot_exceed_harvests() {
        let store = MemoryStore::new();
        let farm = seed_farm(&store).await;
        let harvest = seed_harvest(&store, &farm, 100).await;

        let batch = Batch::new(
            farmer().user_id,
            vec![harvest.harvest_id.clone()],
            Decimal::from(150),
            3,
        );
        let err = store.create_batch(&farmer(), batch).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(TraceError::WeightExceedsParts { .. })
        ));
    }

    #[tokio::test]
    async fn test_harvest_cannot_join_two_batches() {
        let store = MemoryStore::new();
        let farm = seed_farm(&store).await;
        let harvest = seed_harvest(&store, &farm, 600).await;

        let first = Batch::new(
            farmer().user_id,
            vec![harvest.harvest_id.clone()],
            Decimal::from(600),
            10,
        );
        store.create_batch(&farmer(), first).await.unwrap();

        let second = Batch::new(
            farmer().user_id,
            vec![harvest.harvest_id.clone()],
            Decimal::from(600),
            10,
        );
        let err = store.create_batch(&farmer(), second).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(TraceError::ConflictingOwnership { .. })
        ));
    }

    #[tokio::test]
    async fn test_lot_with_no_batches_lists_empty_children() {
        let store = MemoryStore::new();
        let lot = Lot::new(processor().user_id, vec![], Decimal::ZERO);
        let lot = store.create_lot(&processor(), lot).await.unwrap();

        let fetched = store.get_lot(lot.lot_id.as_str()).await.unwrap().unwrap();
        let children =
            trace_core::resolve_children(EntityKind::Lot, &fetched.batch_ids).unwrap();
        assert!(children.is_empty());
    }

    #[tokio::test]
    async fn test_lot_export_approval_assigns_exporter() {
        let store = MemoryStore::new();
        let lot = Lot::new(processor().user_id, vec![], Decimal::ZERO);
        let lot = store.create_lot(&processor(), lot).await.unwrap();

        let approved = store
            .transition_lot(&exporter(), lot.lot_id.as_str(), "export_approved")
            .await
            .unwrap();
        assert_eq!(approved.exporter_id, Some(exporter().user_id));

        let received = store
            .record_lot_receipt(&exporter(), lot.lot_id.as_str(), Decimal::ZERO)
            .await
            .unwrap();
        assert!(received.date_received.is_some());
    }

    #[tokio::test]
    async fn test_consignment_export_sets_date() {
        let store = MemoryStore::new();
        let consignment = Consignment::new(
            exporter().user_id,
            vec![],
            "Belgium",
            "Antwerp",
            trace_core::ShippingMethod::Sea,
        );
        let consignment = store
            .create_consignment(&exporter(), consignment)
            .await
            .unwrap();

        let exported = store
            .transition_consignment(&exporter(), consignment.consignment_id.as_str(), "exported")
            .await
            .unwrap();
        assert_eq!(exported.status, trace_core::ConsignmentStatus::Exported);
        assert!(exported.export_date.is_some());
    }

    #[tokio::test]
    async fn test_kyc_review_requires_extension_worker() {
        let store = MemoryStore::new();
        let profile = UserProfile::new(farmer().user_id, "Amina", Role::Farmer);
        store.upsert_user(profile).await.unwrap();

        let err = store
            .review_kyc(&processor(), "user:farmer1", KycStatus::Verified)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(TraceError::RoleNotPermitted { .. })
        ));

        let reviewed = store
            .review_kyc(&extension(), "user:farmer1", KycStatus::Verified)
            .await
            .unwrap();
        assert_eq!(reviewed.kyc_status, KycStatus::Verified);
    }

    #[tokio::test]
    async fn test_dashboard_scopes_by_role() {
        let store = MemoryStore::new();
        let farm = seed_farm(&store).await;
        seed_harvest(&store, &farm, 600).await;

        let farmer_view = store.dashboard(&farmer()).await.unwrap();
        assert_eq!(farmer_view.sections.len(), 3);
        assert_eq!(farmer_view.sections[0].kind, EntityKind::Farm);
        assert_eq!(farmer_view.sections[0].count, 1);

        // Extension worker sees the pending review queues
        let ext_view = store.dashboard(&extension()).await.unwrap();
        assert!(!ext_view.read_only);
        assert_eq!(ext_view.sections[0].count, 1);

        // Regulator sees nothing until something is exported
        let reg_view = store
            .dashboard(&Actor::new(UserId::new("user:reg1"), Role::Regulator))
            .await
            .unwrap();
        assert!(reg_view.read_only);
        assert!(reg_view.sections.iter().all(|s| s.count == 0));
    }

    #[tokio::test]
    async fn test_audit_chain_records_lifecycle() {
        let store = MemoryStore::new();
        let farm = seed_farm(&store).await;
        store
            .transition_farm(&extension(), farm.farm_id.as_str(), "approved")
            .await
            .unwrap();
        store
            .soft_delete_farm(&farmer(), farm.farm_id.as_str())
            .await
            .unwrap();

        assert!(store.audit_verified().await);
        let recent = store.audit_recent(10).await;
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].action, AuditAction::SoftDeleted);
        assert_eq!(recent[2].action, AuditAction::Created);
    }
}
