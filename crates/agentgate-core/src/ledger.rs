//! Prior-decision lookup used to suppress repeated enforcement comments.
//!
//! A record is keyed by pull request number and head commit SHA, so a new
//! push always re-arms enforcement. The ledger is injected by the caller;
//! nothing here is global.

use std::collections::HashSet;
use std::sync::Mutex;

/// Key of one recorded enforcement comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecisionKey {
    pub pull_request: u64,
    pub head_sha: String,
}

impl DecisionKey {
    pub fn new(pull_request: u64, head_sha: impl Into<String>) -> Self {
        Self {
            pull_request,
            head_sha: head_sha.into(),
        }
    }
}

/// Lookup of enforcement comments already posted.
pub trait DecisionLedger: Send + Sync {
    /// Whether an enforcement comment was already posted for `key`.
    fn already_commented(&self, key: &DecisionKey) -> bool;

    /// Record a successfully posted enforcement comment.
    fn record_comment(&self, key: DecisionKey);
}

/// Ledger that remembers nothing: every failing evaluation posts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDecisionLedger;

impl DecisionLedger for NoopDecisionLedger {
    fn already_commented(&self, _key: &DecisionKey) -> bool {
        false
    }

    fn record_comment(&self, _key: DecisionKey) {}
}

/// In-memory ledger scoped to one process run.
#[derive(Debug, Default)]
pub struct MemoryDecisionLedger {
    posted: Mutex<HashSet<DecisionKey>>,
}

impl MemoryDecisionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.posted.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DecisionLedger for MemoryDecisionLedger {
    fn already_commented(&self, key: &DecisionKey) -> bool {
        self.posted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(key)
    }

    fn record_comment(&self, key: DecisionKey) {
        self.posted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_ledger_records_per_sha() {
        let ledger = MemoryDecisionLedger::new();
        let key = DecisionKey::new(39, "abc123");
        assert!(!ledger.already_commented(&key));

        ledger.record_comment(key.clone());
        assert!(ledger.already_commented(&key));
        assert!(!ledger.already_commented(&DecisionKey::new(39, "def456")));
        assert!(!ledger.already_commented(&DecisionKey::new(40, "abc123")));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_noop_ledger_never_remembers() {
        let ledger = NoopDecisionLedger;
        let key = DecisionKey::new(1, "sha");
        ledger.record_comment(key.clone());
        assert!(!ledger.already_commented(&key));
    }
}
