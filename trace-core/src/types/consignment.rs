//! Consignment Entity
//!
//! An exporter's aggregation of one or more lots: a single export
//! shipment. Terminal entity with no rejection path; a consignment is
//! irrevocable once created.

use super::common::{ConsignmentId, LotId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Consignment status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsignmentStatus {
    Created,
    Exported,
}

impl ConsignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsignmentStatus::Created => "created",
            ConsignmentStatus::Exported => "exported",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(ConsignmentStatus::Created),
            "exported" => Some(ConsignmentStatus::Exported),
            _ => None,
        }
    }
}

/// Shipping method for an export consignment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    Sea,
    Air,
    Road,
}

/// An export consignment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Consignment {
    pub consignment_id: ConsignmentId,
    /// Exporter who assembled the consignment
    pub exporter_id: UserId,
    /// Constituent lots
    pub lot_ids: Vec<LotId>,
    pub destination_country: String,
    pub destination_port: String,
    pub export_date: Option<NaiveDate>,
    pub shipping_method: ShippingMethod,
    pub status: ConsignmentStatus,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Consignment {
    pub fn new(
        exporter_id: UserId,
        lot_ids: Vec<LotId>,
        destination_country: impl Into<String>,
        destination_port: impl Into<String>,
        shipping_method: ShippingMethod,
    ) -> Self {
        let now = Utc::now();
        Self {
            consignment_id: ConsignmentId::generate(),
            exporter_id,
            lot_ids,
            destination_country: destination_country.into(),
            destination_port: destination_port.into(),
            export_date: None,
            shipping_method,
            status: ConsignmentStatus::Created,
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

    #[test]
    fn test_new_consignment_starts_created() {
        let consignment = Consignment::new(
            UserId::new("user:e1"),
            vec![LotId::new("lot:1")],
            "Belgium",
            "Antwerp",
            ShippingMethod::Sea,
        );
        assert_eq!(consignment.status, ConsignmentStatus::Created);
        assert!(consignment.export_date.is_none());
    }

    #[test]
    fn test_no_rejection_status_exists() {
        assert_eq!(ConsignmentStatus::parse("rejected"), None);
        assert_eq!(ConsignmentStatus::parse("export_rejected"), None);
    }
}
