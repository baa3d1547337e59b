//! Transition Table
//!
//! The single table-driven source of truth for every entity's legal
//! status transitions and the role that may trigger each. Every screen
//! and endpoint consults this table; nothing re-derives it.

use crate::types::{EntityKind, Role};

/// One legal transition row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub kind: EntityKind,
    pub from: &'static str,
    pub to: &'static str,
    /// Roles that may trigger this transition
    pub roles: &'static [Role],
}

const EXTENSION: &[Role] = &[Role::ExtensionWorker];
const PROCESSOR: &[Role] = &[Role::Processor];
const EXPORTER: &[Role] = &[Role::Exporter];
const EXPORTER_OR_REGULATOR: &[Role] = &[Role::Exporter, Role::Regulator];

/// All legal transitions.
///
/// Rejection rows are carried explicitly per source state rather than as
/// a wildcard, so the table stays the complete enumeration: terminal
/// rejection is reachable from every pending/in-review state, triggered
/// by the role holding custody (or the reviewing role) at that stage.
pub const TRANSITIONS: &[TransitionRule] = &[
    // Farm: pending -> {approved, rejected} by extension worker
    TransitionRule { kind: EntityKind::Farm, from: "pending", to: "approved", roles: EXTENSION },
    TransitionRule { kind: EntityKind::Farm, from: "pending", to: "rejected", roles: EXTENSION },
    // Harvest: pending -> {approved, flagged, rejected}; flagged -> {approved, rejected}
    TransitionRule { kind: EntityKind::Harvest, from: "pending", to: "approved", roles: EXTENSION },
    TransitionRule { kind: EntityKind::Harvest, from: "pending", to: "flagged", roles: EXTENSION },
    TransitionRule { kind: EntityKind::Harvest, from: "pending", to: "rejected", roles: EXTENSION },
    TransitionRule { kind: EntityKind::Harvest, from: "flagged", to: "approved", roles: EXTENSION },
    TransitionRule { kind: EntityKind::Harvest, from: "flagged", to: "rejected", roles: EXTENSION },
    // Batch: submitted -> received -> processing -> processed -> exported,
    // any non-terminal -> rejected
    TransitionRule { kind: EntityKind::Batch, from: "submitted", to: "received", roles: PROCESSOR },
    TransitionRule { kind: EntityKind::Batch, from: "received", to: "processing", roles: PROCESSOR },
    TransitionRule { kind: EntityKind::Batch, from: "processing", to: "processed", roles: PROCESSOR },
    TransitionRule { kind: EntityKind::Batch, from: "processed", to: "exported", roles: EXPORTER },
    TransitionRule { kind: EntityKind::Batch, from: "submitted", to: "rejected", roles: PROCESSOR },
    TransitionRule { kind: EntityKind::Batch, from: "received", to: "rejected", roles: PROCESSOR },
    TransitionRule { kind: EntityKind::Batch, from: "processing", to: "rejected", roles: PROCESSOR },
    TransitionRule { kind: EntityKind::Batch, from: "processed", to: "rejected", roles: EXPORTER },
    // Lot: created -> export_approved -> exported; created -> export_rejected
    TransitionRule { kind: EntityKind::Lot, from: "created", to: "export_approved", roles: EXPORTER_OR_REGULATOR },
    TransitionRule { kind: EntityKind::Lot, from: "created", to: "export_rejected", roles: EXPORTER_OR_REGULATOR },
    TransitionRule { kind: EntityKind::Lot, from: "export_approved", to: "exported", roles: EXPORTER },
    // Consignment: created -> exported (no rejection path modeled)
    TransitionRule { kind: EntityKind::Consignment, from: "created", to: "exported", roles: EXPORTER },
];

/// The full status vocabulary per entity kind. Used to tell an unknown
/// status (schema drift) apart from a known-but-illegal transition.
pub fn known_statuses(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Farm => &["pending", "approved", "rejected"],
        EntityKind::Harvest => &["pending", "approved", "flagged", "rejected"],
        EntityKind::Batch => &[
            "submitted",
            "received",
            "processing",
            "processed",
            "exported",
            "rejected",
        ],
        EntityKind::Lot => &["created", "export_approved", "export_rejected", "exported"],
        EntityKind::Consignment => &["created", "exported"],
    }
}
