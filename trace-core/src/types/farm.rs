//! Farm Entity
//!
//! Created by a farmer; approved or rejected by an extension worker.
//! Soft-deletable, never hard-removed.

use super::common::{FarmId, GeoShape, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Farm review status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FarmStatus {
    Pending,
    Approved,
    Rejected,
}

impl FarmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmStatus::Pending => "pending",
            FarmStatus::Approved => "approved",
            FarmStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(FarmStatus::Pending),
            "approved" => Some(FarmStatus::Approved),
            "rejected" => Some(FarmStatus::Rejected),
            _ => None,
        }
    }
}

/// A registered farm
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub farm_id: FarmId,
    /// Owning farmer (exactly one)
    pub owner_id: UserId,
    pub name: String,
    pub location: GeoShape,
    pub area_hectares: Decimal,
    pub perimeter_m: Option<Decimal>,
    pub cultivation_methods: Vec<String>,
    pub certifications: Vec<String>,
    pub status: FarmStatus,
    /// Tombstone: excluded from active listings, retained for audit
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Farm {
    pub fn new(owner_id: UserId, name: impl Into<String>, location: GeoShape) -> Self {
        let now = Utc::now();
        Self {
            farm_id: FarmId::generate(),
            owner_id,
            name: name.into(),
            location,
            area_hectares: Decimal::ZERO,
            perimeter_m: None,
            cultivation_methods: Vec::new(),
            certifications: Vec::new(),
            status: FarmStatus::Pending,
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
    use crate::types::GeoPoint;

    #[test]
    fn test_new_farm_is_pending_and_active() {
        let farm = Farm::new(
            UserId::new("user:f1"),
            "Gashonga Hill",
            GeoShape::Point {
                point: GeoPoint { lat: -2.0, lng: 29.7 },
            },
        );
        assert_eq!(farm.status, FarmStatus::Pending);
        assert!(farm.is_active());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(FarmStatus::parse("approved"), Some(FarmStatus::Approved));
        assert_eq!(FarmStatus::parse("flagged"), None);
        assert_eq!(FarmStatus::Rejected.as_str(), "rejected");
    }
}
