//! Custody Chain
//!
//! Physical custody of a batch/lot/consignment moves one way only:
//! farmer -> processor -> exporter. A later-stage actor cannot hold
//! custody before the earlier stage completes, and custody never moves
//! backwards.

use crate::error::{TraceError, TraceResult};
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered custody stages
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustodyStage {
    Farmer,
    Processor,
    Exporter,
}

impl CustodyStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustodyStage::Farmer => "farmer",
            CustodyStage::Processor => "processor",
            CustodyStage::Exporter => "exporter",
        }
    }

    /// The only stage custody may advance to from here
    pub fn next(&self) -> Option<CustodyStage> {
        match self {
            CustodyStage::Farmer => Some(CustodyStage::Processor),
            CustodyStage::Processor => Some(CustodyStage::Exporter),
            CustodyStage::Exporter => None,
        }
    }
}

impl std::fmt::Display for CustodyStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who currently holds an entity, and since when
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Custody {
    pub stage: CustodyStage,
    pub holder: UserId,
    pub since: DateTime<Utc>,
}

impl Custody {
    /// Custody starts with the farmer who created the entity
    pub fn originating(holder: UserId) -> Self {
        Self {
            stage: CustodyStage::Farmer,
            holder,
            since: Utc::now(),
        }
    }

    pub fn new(stage: CustodyStage, holder: UserId) -> Self {
        Self {
            stage,
            holder,
            since: Utc::now(),
        }
    }

    /// Transfer custody to the next stage. Skipping a stage or moving
    /// backwards is a custody regression.
    pub fn transfer_to(&mut self, stage: CustodyStage, holder: UserId) -> TraceResult<()> {
        if self.stage.next() != Some(stage) {
            return Err(TraceError::CustodyRegression {
                from: self.stage.as_str().to_string(),
                to: stage.as_str().to_string(),
            });
        }
        self.stage = stage;
        self.holder = holder;
        self.since = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custody_advances_in_order() {
        let mut custody = Custody::originating(UserId::new("user:farmer1"));
        custody
            .transfer_to(CustodyStage::Processor, UserId::new("user:proc1"))
            .unwrap();
        assert_eq!(custody.stage, CustodyStage::Processor);
        custody
            .transfer_to(CustodyStage::Exporter, UserId::new("user:exp1"))
            .unwrap();
        assert_eq!(custody.stage, CustodyStage::Exporter);
    }

    #[test]
    fn test_custody_cannot_skip_processor() {
        let mut custody = Custody::originating(UserId::new("user:farmer1"));
        let err = custody
            .transfer_to(CustodyStage::Exporter, UserId::new("user:exp1"))
            .unwrap_err();
        assert!(matches!(err, TraceError::CustodyRegression { .. }));
        assert_eq!(custody.stage, CustodyStage::Farmer);
    }

    #[test]
    fn test_custody_cannot_move_backwards() {
        let mut custody = Custody::new(CustodyStage::Exporter, UserId::new("user:exp1"));
        let err = custody
            .transfer_to(CustodyStage::Processor, UserId::new("user:proc1"))
            .unwrap_err();
        assert!(matches!(err, TraceError::CustodyRegression { .. }));
    }

    #[test]
    fn test_exporter_is_final_stage() {
        assert_eq!(CustodyStage::Exporter.next(), None);
    }
}
