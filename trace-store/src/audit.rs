//! Append-Only Audit Log
//!
//! Every create, status transition and soft deletion appends a record.
//! Records are digest-chained: each record's digest covers the previous
//! record's digest, so any rewrite of history breaks verification.
//! Nothing is ever removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use trace_core::Actor;

/// What happened to an entity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Transitioned,
    SoftDeleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "created",
            AuditAction::Transitioned => "transitioned",
            AuditAction::SoftDeleted => "soft_deleted",
        }
    }
}

/// One audit record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub seq: u64,
    pub at: DateTime<Utc>,
    pub actor: Actor,
    pub action: AuditAction,
    pub entity_kind: String,
    pub entity_id: String,
    /// Transition detail, e.g. "submitted -> received"
    pub detail: Option<String>,
    /// Hex digest of the previous record (zeros for the first)
    pub prev_digest: String,
    /// Hex digest over (seq, prev_digest, action, entity, detail)
    pub digest: String,
}

const GENESIS_DIGEST: &str = "0000000000000000000000000000000000000000000000000000000000000000";

fn record_digest(
    seq: u64,
    prev_digest: &str,
    action: AuditAction,
    entity_kind: &str,
    entity_id: &str,
    detail: Option<&str>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seq.to_be_bytes());
    hasher.update(prev_digest.as_bytes());
    hasher.update(action.as_str().as_bytes());
    hasher.update(entity_kind.as_bytes());
    hasher.update(entity_id.as_bytes());
    if let Some(detail) = detail {
        hasher.update(detail.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// The append-only log itself
#[derive(Debug, Default)]
pub struct AuditLog {
    records: Vec<AuditRecord>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, chaining its digest to the previous one
    pub fn append(
        &mut self,
        actor: &Actor,
        action: AuditAction,
        entity_kind: &str,
        entity_id: &str,
        detail: Option<String>,
    ) -> &AuditRecord {
        let seq = self.records.len() as u64;
        let prev_digest = self
            .records
            .last()
            .map(|r| r.digest.clone())
            .unwrap_or_else(|| GENESIS_DIGEST.to_string());
        let digest = record_digest(
            seq,
            &prev_digest,
            action,
            entity_kind,
            entity_id,
            detail.as_deref(),
        );
        self.records.push(AuditRecord {
            seq,
            at: Utc::now(),
            actor: actor.clone(),
            action,
            entity_kind: entity_kind.to_string(),
            entity_id: entity_id.to_string(),
            detail,
            prev_digest,
            digest,
        });
        self.records.last().expect("record just pushed")
    }

    /// Most recent records, newest first
    pub fn recent(&self, limit: usize) -> Vec<AuditRecord> {
        self.records.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recompute every digest and verify the chain links up
    pub fn verify_chain(&self) -> bool {
        let mut prev = GENESIS_DIGEST.to_string();
        for record in &self.records {
            if record.prev_digest != prev {
                return false;
            }
            let expected = record_digest(
                record.seq,
                &record.prev_digest,
                record.action,
                &record.entity_kind,
                &record.entity_id,
                record.detail.as_deref(),
            );
            if record.digest != expected {
                return false;
            }
            prev = record.digest.clone();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trace_core::{Role, UserId};

    fn actor() -> Actor {
        Actor::new(UserId::new("user:ext1"), Role::ExtensionWorker)
    }

    #[test]
    fn test_chain_verifies() {
        let mut log = AuditLog::new();
        log.append(&actor(), AuditAction::Created, "farm", "farm:1", None);
        log.append(
            &actor(),
            AuditAction::Transitioned,
            "farm",
            "farm:1",
            Some("pending -> approved".into()),
        );
        assert_eq!(log.len(), 2);
        assert!(log.verify_chain());
    }

    #[test]
    fn test_tampering_breaks_the_chain() {
        let mut log = AuditLog::new();
        log.append(&actor(), AuditAction::Created, "farm", "farm:1", None);
        log.append(&actor(), AuditAction::SoftDeleted, "farm", "farm:1", None);
        log.records[0].entity_id = "farm:2".to_string();
        assert!(!log.verify_chain());
    }

    #[test]
    fn test_recent_is_newest_first() {
        let mut log = AuditLog::new();
        log.append(&actor(), AuditAction::Created, "farm", "farm:1", None);
        log.append(&actor(), AuditAction::Created, "farm", "farm:2", None);
        let recent = log.recent(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].entity_id, "farm:2");
    }
}
