//! Status Workflow
//!
//! Per-entity allowed status values and legal transitions, centralized
//! in one table instead of re-derived per screen.

pub mod machine;
pub mod table;

pub use machine::{can_transition, check_transition, legal_targets, rules_from};
pub use table::{known_statuses, TransitionRule, TRANSITIONS};
