//! Enforcement policy: map an aggregate judgment to an action.
//!
//! The engine is stateless per call. Whether a `PostComment` decision
//! actually reaches the comment collaborator is decided by the caller
//! (dry-run, prior-decision ledger); this module only decides.

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateStatus;

/// Action that follows from an aggregate judgment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementAction {
    None,
    PostComment,
    /// Informational only; never posts.
    ReportPending,
    /// Informational only; the check provider could not be reached.
    ReportUnavailable,
}

impl EnforcementAction {
    /// Whether this action requires the comment collaborator.
    pub fn posts_comment(&self) -> bool {
        matches!(self, EnforcementAction::PostComment)
    }
}

/// Outcome of one policy evaluation. Created fresh per evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnforcementDecision {
    pub pull_request: u64,
    pub aggregate: AggregateStatus,
    pub action: EnforcementAction,
    pub dry_run: bool,
}

impl EnforcementDecision {
    /// Whether the caller should invoke the comment collaborator.
    pub fn requires_comment(&self) -> bool {
        self.action.posts_comment() && !self.dry_run
    }
}

/// Map an aggregate to its action.
///
/// | aggregate   | action              |
/// |-------------|---------------------|
/// | Passing     | None                |
/// | Failing     | PostComment         |
/// | Pending     | ReportPending       |
/// | NoChecks    | ReportPending       |
/// | Unavailable | ReportUnavailable   |
pub fn action_for(aggregate: AggregateStatus) -> EnforcementAction {
    match aggregate {
        AggregateStatus::Passing => EnforcementAction::None,
        AggregateStatus::Failing => EnforcementAction::PostComment,
        AggregateStatus::Pending | AggregateStatus::NoChecks => EnforcementAction::ReportPending,
        AggregateStatus::Unavailable => EnforcementAction::ReportUnavailable,
    }
}

/// Evaluate the policy for one pull request.
///
/// `dry_run` does not change the action; it is carried on the decision so
/// the caller skips side effects.
pub fn evaluate(pull_request: u64, aggregate: AggregateStatus, dry_run: bool) -> EnforcementDecision {
    EnforcementDecision {
        pull_request,
        aggregate,
        action: action_for(aggregate),
        dry_run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table() {
        assert_eq!(action_for(AggregateStatus::Passing), EnforcementAction::None);
        assert_eq!(
            action_for(AggregateStatus::Failing),
            EnforcementAction::PostComment
        );
        assert_eq!(
            action_for(AggregateStatus::Pending),
            EnforcementAction::ReportPending
        );
        assert_eq!(
            action_for(AggregateStatus::Unavailable),
            EnforcementAction::ReportUnavailable
        );
    }

    #[test]
    fn test_no_checks_aliases_pending_action() {
        assert_eq!(
            action_for(AggregateStatus::NoChecks),
            action_for(AggregateStatus::Pending)
        );
    }

    #[test]
    fn test_dry_run_keeps_action() {
        let live = evaluate(39, AggregateStatus::Failing, false);
        let dry = evaluate(39, AggregateStatus::Failing, true);
        assert_eq!(live.action, EnforcementAction::PostComment);
        assert_eq!(dry.action, EnforcementAction::PostComment);
        assert!(live.requires_comment());
        assert!(!dry.requires_comment());
    }

    #[test]
    fn test_non_failing_never_requires_comment() {
        for aggregate in [
            AggregateStatus::Passing,
            AggregateStatus::Pending,
            AggregateStatus::NoChecks,
            AggregateStatus::Unavailable,
        ] {
            assert!(!evaluate(1, aggregate, false).requires_comment());
        }
    }

    #[test]
    fn test_decision_carries_pull_request() {
        let decision = evaluate(412, AggregateStatus::Passing, false);
        assert_eq!(decision.pull_request, 412);
        assert_eq!(decision.aggregate, AggregateStatus::Passing);
        assert!(!decision.dry_run);
    }
}
