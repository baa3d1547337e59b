//! Status State Machine
//!
//! Pure decision functions over the transition table. No side effects:
//! the actual mutation happens in the storage layer after a check here
//! succeeds.
//!
//! All entry points are string-keyed and fail closed: an entity kind or
//! status the table has never heard of yields `UnknownTransition`, never
//! a panic, so callers stay resilient to backend schema drift.

use super::table::{known_statuses, TransitionRule, TRANSITIONS};
use crate::error::{TraceError, TraceResult};
use crate::types::{EntityKind, Role};

/// Check whether `role` may move an entity of `kind` from `current` to
/// `target`. Distinguishes three failure kinds:
///
/// - `UnknownTransition`: `kind`, `current` or `target` is not in the
///   table's vocabulary
/// - `IllegalTransition`: both statuses are known but the edge does not
///   exist
/// - `RoleNotPermitted`: the edge exists but this role may not trigger it
pub fn check_transition(
    kind: &str,
    current: &str,
    target: &str,
    role: Role,
) -> TraceResult<()> {
    let unknown = || TraceError::UnknownTransition {
        kind: kind.to_string(),
        from: current.to_string(),
        to: target.to_string(),
    };

    let parsed = EntityKind::parse(kind).ok_or_else(unknown)?;
    let statuses = known_statuses(parsed);
    if !statuses.contains(&current) || !statuses.contains(&target) {
        return Err(unknown());
    }

    let rule = TRANSITIONS
        .iter()
        .find(|r| r.kind == parsed && r.from == current && r.to == target)
        .ok_or_else(|| TraceError::IllegalTransition {
            kind: kind.to_string(),
            from: current.to_string(),
            to: target.to_string(),
        })?;

    if !rule.roles.contains(&role) {
        return Err(TraceError::RoleNotPermitted {
            kind: kind.to_string(),
            from: current.to_string(),
            to: target.to_string(),
            role: role.as_str().to_string(),
        });
    }

    Ok(())
}

/// Boolean form of [`check_transition`]. Never panics; false for any
/// failure including unknown inputs.
pub fn can_transition(kind: &str, current: &str, target: &str, role: Role) -> bool {
    check_transition(kind, current, target, role).is_ok()
}

/// Legal next statuses from `current` for this role. Empty for terminal
/// or unknown statuses. UIs use this to decide which actions to enable.
pub fn legal_targets(kind: EntityKind, current: &str, role: Role) -> Vec<&'static str> {
    TRANSITIONS
        .iter()
        .filter(|r| r.kind == kind && r.from == current && r.roles.contains(&role))
        .map(|r| r.to)
        .collect()
}

/// Every rule leaving `current` regardless of role
pub fn rules_from(kind: EntityKind, current: &str) -> Vec<&'static TransitionRule> {
    TRANSITIONS
        .iter()
        .filter(|r| r.kind == kind && r.from == current)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_transitions_accept_documented_role_only() {
        // For every rule in the table, the listed roles pass and every
        // other role is refused.
        for rule in TRANSITIONS {
            for role in Role::all() {
                let ok = can_transition(rule.kind.as_str(), rule.from, rule.to, role);
                assert_eq!(
                    ok,
                    rule.roles.contains(&role),
                    "{:?} with role {}",
                    rule,
                    role
                );
            }
        }
    }

    #[test]
    fn test_farm_approval_by_extension_worker() {
        assert!(can_transition("farm", "pending", "approved", Role::ExtensionWorker));
        assert!(!can_transition("farm", "pending", "approved", Role::Farmer));
    }

    #[test]
    fn test_approved_farm_cannot_be_approved_again() {
        let err = check_transition("farm", "approved", "approved", Role::ExtensionWorker)
            .unwrap_err();
        assert!(matches!(err, TraceError::IllegalTransition { .. }));
    }

    #[test]
    fn test_wrong_actor_is_role_not_permitted() {
        let err = check_transition("farm", "pending", "approved", Role::Farmer).unwrap_err();
        assert!(matches!(err, TraceError::RoleNotPermitted { .. }));
    }

    #[test]
    fn test_unknown_kind_fails_closed() {
        assert!(!can_transition("shipment", "pending", "approved", Role::ExtensionWorker));
        let err =
            check_transition("shipment", "pending", "approved", Role::ExtensionWorker).unwrap_err();
        assert!(matches!(err, TraceError::UnknownTransition { .. }));
    }

    #[test]
    fn test_unknown_status_fails_closed_not_illegal() {
        // Schema drift: a status string the client has never seen must be
        // reported as unknown, not as an illegal edge.
        let err = check_transition("batch", "submitted", "archived", Role::Processor).unwrap_err();
        assert!(matches!(err, TraceError::UnknownTransition { .. }));
    }

    #[test]
    fn test_batch_cannot_skip_intermediate_states() {
        assert!(!can_transition("batch", "submitted", "processed", Role::Processor));
        assert!(!can_transition("batch", "received", "exported", Role::Exporter));
    }

    #[test]
    fn test_batch_rejected_is_terminal() {
        for role in Role::all() {
            for target in known_statuses(EntityKind::Batch) {
                assert!(!can_transition("batch", "rejected", target, role));
            }
        }
    }

    #[test]
    fn test_harvest_flagged_review_path() {
        assert!(can_transition("harvest", "pending", "flagged", Role::ExtensionWorker));
        assert!(can_transition("harvest", "flagged", "approved", Role::ExtensionWorker));
        assert!(can_transition("harvest", "flagged", "rejected", Role::ExtensionWorker));
        // flagged is not reachable from approved
        assert!(!can_transition("harvest", "approved", "flagged", Role::ExtensionWorker));
    }

    #[test]
    fn test_lot_regulator_may_approve_but_not_export() {
        assert!(can_transition("lot", "created", "export_approved", Role::Regulator));
        assert!(can_transition("lot", "created", "export_rejected", Role::Regulator));
        assert!(!can_transition("lot", "export_approved", "exported", Role::Regulator));
        assert!(can_transition("lot", "export_approved", "exported", Role::Exporter));
    }

    #[test]
    fn test_consignment_single_path() {
        assert!(can_transition("consignment", "created", "exported", Role::Exporter));
        assert!(!can_transition("consignment", "created", "exported", Role::Processor));
        assert!(legal_targets(EntityKind::Consignment, "exported", Role::Exporter).is_empty());
    }

    #[test]
    fn test_legal_targets_for_processor_on_submitted_batch() {
        let mut targets = legal_targets(EntityKind::Batch, "submitted", Role::Processor);
        targets.sort();
        assert_eq!(targets, vec!["received", "rejected"]);
    }
}
