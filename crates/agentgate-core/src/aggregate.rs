//! Collapse a set of check results into one aggregate judgment.

use serde::{Deserialize, Serialize};

use crate::checks::{CheckResult, ChecksOutcome, Conclusion};

/// Aggregate judgment over all checks of one commit. Derived, never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AggregateStatus {
    Passing,
    Failing,
    Pending,
    NoChecks,
    /// The check provider could not be reached.
    Unavailable,
}

impl AggregateStatus {
    /// Operator-facing wording. `NoChecks` shares `Pending`'s action but
    /// is worded distinctly.
    pub fn describe(&self) -> &'static str {
        match self {
            AggregateStatus::Passing => "all checks passing",
            AggregateStatus::Failing => "failing",
            AggregateStatus::Pending => "checks still running",
            AggregateStatus::NoChecks => "no checks reported",
            AggregateStatus::Unavailable => "check status unavailable",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AggregateStatus::Passing => "✓",
            AggregateStatus::Failing => "✗",
            AggregateStatus::Pending => "⏳",
            AggregateStatus::NoChecks => "—",
            AggregateStatus::Unavailable => "?",
        }
    }
}

impl std::fmt::Display for AggregateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Reduce `checks` to an [`AggregateStatus`].
///
/// Rule, first match wins:
/// 1. no checks → `NoChecks`
/// 2. any `failure` → `Failing`
/// 3. any `pending`/`unknown` → `Pending`
/// 4. otherwise → `Passing`
///
/// Order of `checks` never affects the result.
pub fn aggregate(checks: &[CheckResult]) -> AggregateStatus {
    if checks.is_empty() {
        return AggregateStatus::NoChecks;
    }

    let mut unsettled = false;
    for check in checks {
        match check.conclusion {
            Conclusion::Failure => return AggregateStatus::Failing,
            Conclusion::Pending | Conclusion::Unknown => unsettled = true,
            Conclusion::Success => {}
        }
    }

    if unsettled {
        AggregateStatus::Pending
    } else {
        AggregateStatus::Passing
    }
}

/// Operator wording for a provider outcome.
///
/// A `Pending` set whose unsettled checks all finished with an unrecognised
/// conclusion (`neutral`, `skipped`, ...) is not running, so it is worded
/// as inconclusive. Every other status uses [`AggregateStatus::describe`].
pub fn describe_outcome(outcome: &ChecksOutcome) -> &'static str {
    let status = aggregate_outcome(outcome);
    match outcome {
        ChecksOutcome::Listed(checks)
            if status == AggregateStatus::Pending
                && !checks.iter().any(|c| c.conclusion == Conclusion::Pending) =>
        {
            INCONCLUSIVE_WORDING
        }
        _ => status.describe(),
    }
}

/// Wording for a `Pending` set with nothing actually in progress.
pub const INCONCLUSIVE_WORDING: &str = "checks inconclusive";

/// Aggregate a provider outcome, keeping an unreachable provider distinct
/// from an empty check set.
pub fn aggregate_outcome(outcome: &ChecksOutcome) -> AggregateStatus {
    match outcome {
        ChecksOutcome::Listed(checks) => aggregate(checks),
        ChecksOutcome::Unavailable(_) => AggregateStatus::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(conclusion: Conclusion) -> CheckResult {
        CheckResult::new("ci", conclusion)
    }

    #[test]
    fn test_empty_is_no_checks() {
        assert_eq!(aggregate(&[]), AggregateStatus::NoChecks);
    }

    #[test]
    fn test_single_success_passes() {
        assert_eq!(
            aggregate(&[check(Conclusion::Success)]),
            AggregateStatus::Passing
        );
    }

    #[test]
    fn test_failure_beats_success() {
        assert_eq!(
            aggregate(&[check(Conclusion::Failure), check(Conclusion::Success)]),
            AggregateStatus::Failing
        );
    }

    #[test]
    fn test_pending_with_success() {
        assert_eq!(
            aggregate(&[check(Conclusion::Pending), check(Conclusion::Success)]),
            AggregateStatus::Pending
        );
    }

    #[test]
    fn test_unknown_counts_as_pending() {
        assert_eq!(
            aggregate(&[check(Conclusion::Success), check(Conclusion::Unknown)]),
            AggregateStatus::Pending
        );
    }

    #[test]
    fn test_failure_beats_pending_regardless_of_position() {
        assert_eq!(
            aggregate(&[check(Conclusion::Pending), check(Conclusion::Failure)]),
            AggregateStatus::Failing
        );
        assert_eq!(
            aggregate(&[check(Conclusion::Failure), check(Conclusion::Pending)]),
            AggregateStatus::Failing
        );
    }

    #[test]
    fn test_unavailable_is_not_no_checks() {
        let outcome = ChecksOutcome::Unavailable("connection refused".to_string());
        assert_eq!(aggregate_outcome(&outcome), AggregateStatus::Unavailable);

        let outcome = ChecksOutcome::Listed(vec![]);
        assert_eq!(aggregate_outcome(&outcome), AggregateStatus::NoChecks);
    }

    #[test]
    fn test_terminal_unknown_is_not_still_running() {
        let outcome = ChecksOutcome::Listed(vec![
            check(Conclusion::Success),
            check(Conclusion::Unknown),
        ]);
        assert_eq!(aggregate_outcome(&outcome), AggregateStatus::Pending);
        assert_eq!(describe_outcome(&outcome), "checks inconclusive");

        let outcome = ChecksOutcome::Listed(vec![
            check(Conclusion::Unknown),
            check(Conclusion::Pending),
        ]);
        assert_eq!(describe_outcome(&outcome), "checks still running");
    }

    #[test]
    fn test_describe_outcome_defers_for_other_statuses() {
        let failing = ChecksOutcome::Listed(vec![
            check(Conclusion::Unknown),
            check(Conclusion::Failure),
        ]);
        assert_eq!(describe_outcome(&failing), "failing");
        assert_eq!(
            describe_outcome(&ChecksOutcome::Listed(vec![])),
            "no checks reported"
        );
        assert_eq!(
            describe_outcome(&ChecksOutcome::Unavailable("timeout".to_string())),
            "check status unavailable"
        );
    }

    #[test]
    fn test_no_checks_worded_apart_from_pending() {
        assert_ne!(
            AggregateStatus::NoChecks.describe(),
            AggregateStatus::Pending.describe()
        );
    }
}
