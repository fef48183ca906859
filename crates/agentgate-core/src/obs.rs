//! Structured observability hooks for enforcement sweeps and parity runs.
//!
//! Events are emitted at `info!` level, failures at `warn!`. The `warn!`
//! events double as the diagnostic channel for item-scoped failures that
//! never abort a run.

use tracing::{info, warn};

use crate::aggregate::AggregateStatus;
use crate::parity::ParityCounts;
use crate::policy::EnforcementDecision;

/// RAII guard that enters a sweep-scoped tracing span.
///
/// ```ignore
/// let _span = SweepSpan::enter(&sweep_id);
/// // every event below carries sweep_id
/// ```
pub struct SweepSpan {
    _span: tracing::span::EnteredSpan,
}

impl SweepSpan {
    pub fn enter(sweep_id: &str) -> Self {
        let span = tracing::info_span!("agentgate.sweep", sweep_id = %sweep_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Fresh identifier for one enforcement sweep.
pub fn new_sweep_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn emit_sweep_started(repo: &str, targets: usize, dry_run: bool) {
    info!(event = "sweep.started", repo = %repo, targets = targets, dry_run = dry_run);
}

pub fn emit_sweep_finished(evaluated: usize, commented: usize, failed: usize) {
    info!(
        event = "sweep.finished",
        evaluated = evaluated,
        commented = commented,
        failed = failed,
    );
}

pub fn emit_decision(decision: &EnforcementDecision) {
    info!(
        event = "enforcement.decided",
        pull_request = decision.pull_request,
        aggregate = ?decision.aggregate,
        action = ?decision.action,
        dry_run = decision.dry_run,
    );
}

/// Comment collaborator failure for one pull request (warn level).
pub fn emit_comment_failed(pull_request: u64, error: &dyn std::fmt::Display) {
    warn!(event = "enforcement.comment_failed", pull_request = pull_request, error = %error);
}

/// A provider call failed and was downgraded for one item (warn level).
pub fn emit_collaborator_unavailable(operation: &str, error: &dyn std::fmt::Display) {
    warn!(event = "collaborator.unavailable", operation = %operation, error = %error);
}

pub fn emit_checks_aggregated(pull_request: u64, checks: usize, status: AggregateStatus) {
    info!(
        event = "checks.aggregated",
        pull_request = pull_request,
        checks = checks,
        status = ?status,
    );
}

pub fn emit_parity_matched(counts: &ParityCounts) {
    info!(
        event = "parity.matched",
        matched = counts.matched,
        a_only = counts.a_only,
        b_only = counts.b_only,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_span_create() {
        let _span = SweepSpan::enter("test-sweep-id");
    }

    #[test]
    fn test_sweep_ids_unique() {
        assert_ne!(new_sweep_id(), new_sweep_id());
    }
}
