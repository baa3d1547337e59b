//! Lot Entity
//!
//! A processor's aggregation of one or more batches, handed to an
//! exporter.

use super::common::{BatchId, LotId, UserId, WeightKg};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lot export status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotStatus {
    Created,
    ExportApproved,
    ExportRejected,
    Exported,
}

impl LotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotStatus::Created => "created",
            LotStatus::ExportApproved => "export_approved",
            LotStatus::ExportRejected => "export_rejected",
            LotStatus::Exported => "exported",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(LotStatus::Created),
            "export_approved" => Some(LotStatus::ExportApproved),
            "export_rejected" => Some(LotStatus::ExportRejected),
            "exported" => Some(LotStatus::Exported),
            _ => None,
        }
    }
}

/// A processor's output lot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub lot_id: LotId,
    /// Processor who created the lot
    pub processor_id: UserId,
    /// Constituent batches
    pub batch_ids: Vec<BatchId>,
    pub total_output_weight_kg: WeightKg,
    /// Weight confirmed by the exporter on receipt
    pub received_weight_kg: Option<WeightKg>,
    pub date_received: Option<DateTime<Utc>>,
    /// Exporter the lot was delivered to, once assigned
    pub exporter_id: Option<UserId>,
    pub status: LotStatus,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lot {
    pub fn new(processor_id: UserId, batch_ids: Vec<BatchId>, total_output_weight_kg: WeightKg) -> Self {
        let now = Utc::now();
        Self {
            lot_id: LotId::generate(),
            processor_id,
            batch_ids,
            total_output_weight_kg,
            received_weight_kg: None,
            date_received: None,
            exporter_id: None,
            status: LotStatus::Created,
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
    use rust_decimal::Decimal;

    #[test]
    fn test_new_lot_starts_created() {
        let lot = Lot::new(UserId::new("user:p1"), vec![], Decimal::from(500));
        assert_eq!(lot.status, LotStatus::Created);
        assert!(lot.batch_ids.is_empty());
        assert!(lot.exporter_id.is_none());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(LotStatus::ExportApproved.as_str(), "export_approved");
        assert_eq!(LotStatus::parse("export_rejected"), Some(LotStatus::ExportRejected));
        assert_eq!(LotStatus::parse("delivered"), None);
    }
}
