//! Weight Reconciliation
//!
//! Compares what a farmer recorded at submission against what the
//! processor confirms on receipt, and checks that no aggregate claims
//! more weight than the sum of its parts. All arithmetic is `Decimal`.

use crate::error::{TraceError, TraceResult};
use crate::types::WeightKg;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quantities recorded at submission
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub bags: u32,
    pub weight_kg: WeightKg,
}

/// Quantities confirmed on receipt
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub bags: u32,
    pub weight_kg: WeightKg,
}

/// Outcome of comparing a receipt against a submission
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// received - submitted (negative on shortfall)
    pub bag_delta: i64,
    /// received - submitted (negative on shortfall)
    pub weight_delta_kg: Decimal,
    /// Any disagreement flags the batch for review
    pub flagged: bool,
}

/// Compare a receipt against the submission it confirms. Enforcement is
/// backend-side; this records the expectation and flags disagreement.
pub fn reconcile(submitted: SubmissionRecord, received: ReceiptRecord) -> Reconciliation {
    let bag_delta = i64::from(received.bags) - i64::from(submitted.bags);
    let weight_delta_kg = received.weight_kg - submitted.weight_kg;
    Reconciliation {
        bag_delta,
        weight_delta_kg,
        flagged: bag_delta != 0 || !weight_delta_kg.is_zero(),
    }
}

/// An aggregate's weight-bearing field must not exceed the sum of its
/// constituent parts' weights recorded at submission.
pub fn check_aggregate_weight(aggregate: WeightKg, parts: &[WeightKg]) -> TraceResult<()> {
    let parts_total: Decimal = parts.iter().copied().sum();
    if aggregate > parts_total {
        return Err(TraceError::WeightExceedsParts {
            aggregate,
            parts: parts_total,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kg(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_matching_receipt_is_clean() {
        let outcome = reconcile(
            SubmissionRecord { bags: 10, weight_kg: kg(600) },
            ReceiptRecord { bags: 10, weight_kg: kg(600) },
        );
        assert!(!outcome.flagged);
        assert_eq!(outcome.bag_delta, 0);
    }

    #[test]
    fn test_short_receipt_is_flagged() {
        // Farmer recorded 10 bags, processor received 8
        let outcome = reconcile(
            SubmissionRecord { bags: 10, weight_kg: kg(600) },
            ReceiptRecord { bags: 8, weight_kg: kg(480) },
        );
        assert!(outcome.flagged);
        assert_eq!(outcome.bag_delta, -2);
        assert_eq!(outcome.weight_delta_kg, kg(-120));
    }

    #[test]
    fn test_overage_is_also_flagged() {
        let outcome = reconcile(
            SubmissionRecord { bags: 10, weight_kg: kg(600) },
            ReceiptRecord { bags: 11, weight_kg: kg(600) },
        );
        assert!(outcome.flagged);
    }

    #[test]
    fn test_aggregate_cannot_exceed_parts() {
        check_aggregate_weight(kg(500), &[kg(300), kg(250)]).unwrap();
        let err = check_aggregate_weight(kg(600), &[kg(300), kg(250)]).unwrap_err();
        assert!(matches!(err, TraceError::WeightExceedsParts { .. }));
    }

    #[test]
    fn test_aggregate_with_no_parts_must_be_zero_or_less() {
        assert!(check_aggregate_weight(kg(0), &[]).is_ok());
        assert!(check_aggregate_weight(kg(1), &[]).is_err());
    }
}
