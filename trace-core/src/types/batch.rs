//! Batch Entity
//!
//! A farmer's submitted unit of harvested coffee aggregating one or more
//! harvests. Custody moves farmer -> processor -> exporter as the batch
//! advances. Two blockchain anchors are written independently: one at
//! farmer submission, one at processor confirmation.

use super::common::{BatchId, ChainAnchor, HarvestId, UserId, WeightKg};
use crate::custody::Custody;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Batch processing status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Submitted,
    Received,
    Processing,
    Processed,
    Exported,
    Rejected,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Submitted => "submitted",
            BatchStatus::Received => "received",
            BatchStatus::Processing => "processing",
            BatchStatus::Processed => "processed",
            BatchStatus::Exported => "exported",
            BatchStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(BatchStatus::Submitted),
            "received" => Some(BatchStatus::Received),
            "processing" => Some(BatchStatus::Processing),
            "processed" => Some(BatchStatus::Processed),
            "exported" => Some(BatchStatus::Exported),
            "rejected" => Some(BatchStatus::Rejected),
            _ => None,
        }
    }

    /// Terminal statuses admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchStatus::Exported | BatchStatus::Rejected)
    }
}

/// A submitted batch of coffee
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub batch_id: BatchId,
    /// Farmer who submitted the batch
    pub farmer_id: UserId,
    /// Constituent harvests
    pub harvest_ids: Vec<HarvestId>,
    pub custody: Custody,
    /// Weight recorded at submission
    pub total_weight_kg: WeightKg,
    /// Bag count recorded at submission
    pub number_of_bags: u32,
    /// Bag count confirmed by the processor on receipt
    pub number_of_bags_received: Option<u32>,
    /// Weight confirmed by the processor on receipt
    pub received_weight_kg: Option<WeightKg>,
    /// Set when receipt quantities disagree with submission
    pub reconciliation_flagged: bool,
    /// Anchor written at farmer submission
    pub farmer_anchor: Option<ChainAnchor>,
    /// Anchor written at processor confirmation
    pub processor_anchor: Option<ChainAnchor>,
    pub status: BatchStatus,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Batch {
    pub fn new(
        farmer_id: UserId,
        harvest_ids: Vec<HarvestId>,
        total_weight_kg: WeightKg,
        number_of_bags: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            batch_id: BatchId::generate(),
            custody: Custody::originating(farmer_id.clone()),
            farmer_id,
            harvest_ids,
            total_weight_kg,
            number_of_bags,
            number_of_bags_received: None,
            received_weight_kg: None,
            reconciliation_flagged: false,
            farmer_anchor: None,
            processor_anchor: None,
            status: BatchStatus::Submitted,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custody::CustodyStage;
    use rust_decimal::Decimal;

    #[test]
    fn test_new_batch_starts_submitted_in_farmer_custody() {
        let batch = Batch::new(
            UserId::new("user:f1"),
            vec![HarvestId::new("harvest:1")],
            Decimal::from(600),
            10,
        );
        assert_eq!(batch.status, BatchStatus::Submitted);
        assert_eq!(batch.custody.stage, CustodyStage::Farmer);
        assert!(!batch.reconciliation_flagged);
        assert!(batch.farmer_anchor.is_none());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(BatchStatus::Exported.is_terminal());
        assert!(BatchStatus::Rejected.is_terminal());
        assert!(!BatchStatus::Processing.is_terminal());
    }
}
