//! Role-Scoped View Resolver
//!
//! Maps a role to the ordered list of entity queries its dashboard
//! issues. Pure lookup over the closed role set; unknown role names fail
//! with `UnknownRole` and callers fall back to the public view.

use crate::error::TraceResult;
use crate::types::{EntityKind, Role};
use serde::Serialize;

/// Which rows of an entity a role's query covers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerScope {
    /// Rows owned/created by the signed-in user
    Own,
    /// Rows currently assigned/delivered to the signed-in user
    AssignedTo,
    /// Every row (reviewing and regulatory roles)
    All,
}

/// Status filter applied to a dashboard query.
///
/// Serialize-only: the filter lists borrow from the static view table,
/// so these types go out on the wire but never come back in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Any status, tombstoned rows excluded
    ActiveAny,
    /// Only the listed statuses (tombstoned rows still excluded)
    AnyOf(Vec<&'static str>),
}

impl StatusFilter {
    /// Whether a row with this status string passes the filter
    pub fn matches(&self, status: &str) -> bool {
        match self {
            StatusFilter::ActiveAny => true,
            StatusFilter::AnyOf(statuses) => statuses.contains(&status),
        }
    }
}

/// One dashboard query: entity kind, row scope, status filter
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntityQuery {
    pub kind: EntityKind,
    pub scope: OwnerScope,
    pub statuses: StatusFilter,
}

/// The ordered set of queries a role's dashboard issues
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewSpec {
    pub role: Role,
    /// Read-only roles may not trigger transitions from their views
    pub read_only: bool,
    pub queries: Vec<EntityQuery>,
}

fn query(kind: EntityKind, scope: OwnerScope, statuses: StatusFilter) -> EntityQuery {
    EntityQuery {
        kind,
        scope,
        statuses,
    }
}

/// Resolve the dashboard view for a role. Total over the closed role
/// set, and idempotent: equal roles yield structurally equal specs.
pub fn scope_for(role: Role) -> ViewSpec {
    match role {
        Role::Farmer => ViewSpec {
            role,
            read_only: false,
            queries: vec![
                query(EntityKind::Farm, OwnerScope::Own, StatusFilter::ActiveAny),
                query(EntityKind::Harvest, OwnerScope::Own, StatusFilter::ActiveAny),
                query(EntityKind::Batch, OwnerScope::Own, StatusFilter::ActiveAny),
            ],
        },
        Role::Processor => ViewSpec {
            role,
            read_only: false,
            queries: vec![
                query(
                    EntityKind::Batch,
                    OwnerScope::AssignedTo,
                    StatusFilter::AnyOf(vec!["received", "processing", "processed"]),
                ),
                query(EntityKind::Lot, OwnerScope::Own, StatusFilter::ActiveAny),
            ],
        },
        Role::Exporter => ViewSpec {
            role,
            read_only: false,
            queries: vec![
                query(
                    EntityKind::Lot,
                    OwnerScope::AssignedTo,
                    StatusFilter::AnyOf(vec!["export_approved", "exported"]),
                ),
                query(
                    EntityKind::Consignment,
                    OwnerScope::Own,
                    StatusFilter::ActiveAny,
                ),
            ],
        },
        Role::ExtensionWorker => ViewSpec {
            role,
            read_only: false,
            queries: vec![
                query(
                    EntityKind::Farm,
                    OwnerScope::All,
                    StatusFilter::AnyOf(vec!["pending"]),
                ),
                query(
                    EntityKind::Harvest,
                    OwnerScope::All,
                    StatusFilter::AnyOf(vec!["pending", "flagged"]),
                ),
            ],
        },
        Role::Regulator => ViewSpec {
            role,
            read_only: true,
            queries: vec![
                query(
                    EntityKind::Batch,
                    OwnerScope::All,
                    StatusFilter::AnyOf(vec!["exported"]),
                ),
                query(
                    EntityKind::Lot,
                    OwnerScope::All,
                    StatusFilter::AnyOf(vec!["exported"]),
                ),
                query(
                    EntityKind::Consignment,
                    OwnerScope::All,
                    StatusFilter::AnyOf(vec!["exported"]),
                ),
            ],
        },
    }
}

/// String entry point: parses the role name first, failing with
/// `UnknownRole` for anything outside the closed set.
pub fn scope_for_name(name: &str) -> TraceResult<ViewSpec> {
    Ok(scope_for(Role::parse(name)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TraceError;

    #[test]
    fn test_scope_for_is_idempotent() {
        for role in Role::all() {
            assert_eq!(scope_for(role), scope_for(role));
        }
    }

    #[test]
    fn test_farmer_sees_own_entities() {
        let spec = scope_for(Role::Farmer);
        assert!(!spec.read_only);
        assert_eq!(spec.queries.len(), 3);
        assert!(spec
            .queries
            .iter()
            .all(|q| q.scope == OwnerScope::Own && q.statuses == StatusFilter::ActiveAny));
    }

    #[test]
    fn test_extension_worker_sees_pending_review_queues() {
        let spec = scope_for(Role::ExtensionWorker);
        let harvest = spec
            .queries
            .iter()
            .find(|q| q.kind == EntityKind::Harvest)
            .unwrap();
        assert!(harvest.statuses.matches("pending"));
        assert!(harvest.statuses.matches("flagged"));
        assert!(!harvest.statuses.matches("approved"));
    }

    #[test]
    fn test_regulator_view_is_read_only_exported_only() {
        let spec = scope_for(Role::Regulator);
        assert!(spec.read_only);
        for q in &spec.queries {
            assert_eq!(q.scope, OwnerScope::All);
            assert!(q.statuses.matches("exported"));
            assert!(!q.statuses.matches("created"));
        }
    }

    #[test]
    fn test_unknown_role_yields_unknown_role_error() {
        let err = scope_for_name("auditor").unwrap_err();
        assert!(matches!(err, TraceError::UnknownRole { ref name } if name == "auditor"));
    }

    #[test]
    fn test_admin_alias_resolves_to_extension_worker_view() {
        let spec = scope_for_name("admin").unwrap();
        assert_eq!(spec.role, Role::ExtensionWorker);
    }

    #[test]
    fn test_view_spec_serializes_for_dashboard_responses() {
        let json = serde_json::to_value(scope_for(Role::Exporter)).unwrap();
        assert_eq!(json["role"], "exporter");
        assert_eq!(json["read_only"], false);
        assert_eq!(
            json["queries"][0]["statuses"]["any_of"],
            serde_json::json!(["export_approved", "exported"])
        );
    }
}
