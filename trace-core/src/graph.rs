//! Relationship Graph
//!
//! Ownership and aggregation edges between the traceable entities:
//!
//! ```text
//! Farm 1 ──* Harvest          (reverse edge via harvest.farm_id)
//! Batch * ──* Harvest         (batch.harvest_ids)
//! Lot * ──1 Batch             (lot.batch_ids)
//! Consignment * ──1 Lot       (consignment.lot_ids)
//! ```
//!
//! Children are resolved lazily from whatever identifier array the parent
//! carries; a parent with no children yields an empty sequence, not an
//! error. A child belongs to at most one aggregating parent at a time.

use crate::error::{TraceError, TraceResult};
use crate::types::EntityKind;
use std::collections::HashMap;

/// The child kind a parent aggregates, if any
pub fn child_kind(parent: EntityKind) -> Option<EntityKind> {
    match parent {
        EntityKind::Farm => Some(EntityKind::Harvest),
        EntityKind::Batch => Some(EntityKind::Harvest),
        EntityKind::Lot => Some(EntityKind::Batch),
        EntityKind::Consignment => Some(EntityKind::Lot),
        EntityKind::Harvest => None,
    }
}

/// Lazy, restartable cursor over a parent's child identifiers.
///
/// Cloning restarts the sequence from the beginning; iteration borrows
/// the backing slice and allocates nothing.
#[derive(Clone, Debug)]
pub struct ChildIds<'a, T> {
    ids: &'a [T],
    pos: usize,
}

impl<'a, T> ChildIds<'a, T> {
    pub fn new(ids: &'a [T]) -> Self {
        Self { ids, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Reset the cursor to the start
    pub fn restart(&mut self) {
        self.pos = 0;
    }
}

impl<'a, T> Iterator for ChildIds<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.ids.get(self.pos)?;
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ids.len() - self.pos;
        (remaining, Some(remaining))
    }
}

/// Resolve a parent's children given the identifier array it carries.
/// Errors only when the parent kind defines no child edge at all.
pub fn resolve_children<'a, T>(
    parent_kind: EntityKind,
    ids: &'a [T],
) -> TraceResult<ChildIds<'a, T>> {
    if child_kind(parent_kind).is_none() {
        return Err(TraceError::UnknownEdge {
            kind: parent_kind.as_str().to_string(),
        });
    }
    Ok(ChildIds::new(ids))
}

/// Child-id -> parent-id index enforcing exclusive custody: a child
/// identifier appears in exactly one parent's child list at a time.
#[derive(Debug, Default)]
pub struct OwnershipLedger {
    owners: HashMap<String, String>,
}

impl OwnershipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `child` as attached to `parent`. Attaching a child already
    /// owned by a different parent is a conflict; re-attaching to the
    /// same parent is a no-op.
    pub fn attach(&mut self, child: impl Into<String>, parent: impl Into<String>) -> TraceResult<()> {
        let child = child.into();
        let parent = parent.into();
        match self.owners.get(&child) {
            Some(owner) if *owner != parent => Err(TraceError::ConflictingOwnership {
                child_id: child,
                owner_id: owner.clone(),
            }),
            _ => {
                self.owners.insert(child, parent);
                Ok(())
            }
        }
    }

    /// Release a child from its parent, if attached
    pub fn detach(&mut self, child: &str) -> Option<String> {
        self.owners.remove(child)
    }

    /// Current owner of a child, if any
    pub fn owner_of(&self, child: &str) -> Option<&str> {
        self.owners.get(child).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BatchId;

    #[test]
    fn test_child_kinds() {
        assert_eq!(child_kind(EntityKind::Lot), Some(EntityKind::Batch));
        assert_eq!(child_kind(EntityKind::Consignment), Some(EntityKind::Lot));
        assert_eq!(child_kind(EntityKind::Harvest), None);
    }

    #[test]
    fn test_empty_child_list_is_empty_sequence_not_error() {
        let ids: Vec<BatchId> = vec![];
        let mut children = resolve_children(EntityKind::Lot, &ids).unwrap();
        assert!(children.is_empty());
        assert_eq!(children.next(), None);
    }

    #[test]
    fn test_cursor_is_restartable() {
        let ids = vec![BatchId::new("batch:1"), BatchId::new("batch:2")];
        let mut children = resolve_children(EntityKind::Lot, &ids).unwrap();
        assert_eq!(children.next().unwrap().as_str(), "batch:1");

        // A clone restarts from the beginning
        let restarted: Vec<_> = children.clone().map(|id| id.as_str()).collect();
        assert_eq!(restarted, vec!["batch:2"]);

        children.restart();
        assert_eq!(children.count(), 2);
    }

    #[test]
    fn test_harvest_has_no_child_edge() {
        let ids: Vec<BatchId> = vec![];
        let err = resolve_children(EntityKind::Harvest, &ids).unwrap_err();
        assert!(matches!(err, TraceError::UnknownEdge { .. }));
    }

    #[test]
    fn test_ownership_conflict() {
        let mut ledger = OwnershipLedger::new();
        ledger.attach("batch:1", "lot:1").unwrap();
        // Same parent again is fine
        ledger.attach("batch:1", "lot:1").unwrap();

        let err = ledger.attach("batch:1", "lot:2").unwrap_err();
        assert!(matches!(
            err,
            TraceError::ConflictingOwnership { ref owner_id, .. } if owner_id == "lot:1"
        ));
    }

    #[test]
    fn test_detach_frees_the_child() {
        let mut ledger = OwnershipLedger::new();
        ledger.attach("batch:1", "lot:1").unwrap();
        assert_eq!(ledger.detach("batch:1").as_deref(), Some("lot:1"));
        ledger.attach("batch:1", "lot:2").unwrap();
        assert_eq!(ledger.owner_of("batch:1"), Some("lot:2"));
    }
}
