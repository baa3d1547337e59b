//! Harvest Entity
//!
//! Belongs to exactly one farm. `flagged` is a review sub-state reachable
//! only from `pending`.

use super::common::{FarmId, HarvestId, WeightKg};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Harvest review status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarvestStatus {
    Pending,
    Approved,
    Flagged,
    Rejected,
}

impl HarvestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarvestStatus::Pending => "pending",
            HarvestStatus::Approved => "approved",
            HarvestStatus::Flagged => "flagged",
            HarvestStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(HarvestStatus::Pending),
            "approved" => Some(HarvestStatus::Approved),
            "flagged" => Some(HarvestStatus::Flagged),
            "rejected" => Some(HarvestStatus::Rejected),
            _ => None,
        }
    }
}

/// A recorded harvest from one farm
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Harvest {
    pub harvest_id: HarvestId,
    pub farm_id: FarmId,
    /// Coffee variety (e.g. bourbon, typica)
    pub variety: String,
    pub weight_kg: WeightKg,
    pub planting_date: Option<NaiveDate>,
    pub harvest_date: NaiveDate,
    pub status: HarvestStatus,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Harvest {
    pub fn new(
        farm_id: FarmId,
        variety: impl Into<String>,
        weight_kg: Decimal,
        harvest_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            harvest_id: HarvestId::generate(),
            farm_id,
            variety: variety.into(),
            weight_kg,
            planting_date: None,
            harvest_date,
            status: HarvestStatus::Pending,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
