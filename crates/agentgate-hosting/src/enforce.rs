//! Test-requirement enforcement over agent pull requests.
//!
//! One sweep evaluates each target pull request in order: fetch the PR,
//! list its checks, aggregate, run the policy and apply the decision.
//! Failures are scoped to the pull request they happened on; the sweep
//! always runs to the end and reports what happened per PR.

use agentgate_core::obs::{self, SweepSpan};
use agentgate_core::{
    aggregate_outcome, describe_outcome, enforcement_comment, evaluate, is_agent_author,
    AggregateStatus, DecisionKey, DecisionLedger, EnforcementAction, EnforcementDecision,
};
use serde::Serialize;
use tracing::info;

use crate::client::HostingClient;
use crate::model::CommentId;

/// Which pull requests a sweep covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnforcementTargets {
    /// One explicit pull request, regardless of author.
    Single(u64),
    /// Every open pull request authored by a known agent.
    AgentAuthored,
}

/// What happened to the comment side of a decision.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CommentOutcome {
    /// The action does not post.
    NotRequired,
    /// Would have posted; dry-run suppressed the call.
    DryRun,
    Posted(CommentId),
    /// Already posted for this head commit.
    Deduplicated,
    Failed(String),
}

/// Result of enforcing one pull request.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestEnforcement {
    pub pull_request: u64,
    pub author: String,
    pub head_sha: String,
    pub decision: EnforcementDecision,
    pub comment: CommentOutcome,
    /// Operator wording of the check state.
    #[serde(skip)]
    pub status_text: &'static str,
}

/// A target that could not be evaluated.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedPullRequest {
    pub pull_request: u64,
    pub reason: String,
}

/// Per-PR outcomes of one sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub sweep_id: String,
    pub evaluated: Vec<PullRequestEnforcement>,
    pub skipped: Vec<SkippedPullRequest>,
}

impl SweepReport {
    /// Number of comments actually posted.
    pub fn commented(&self) -> usize {
        self.evaluated
            .iter()
            .filter(|e| matches!(e.comment, CommentOutcome::Posted(_)))
            .count()
    }

    /// Number of comment attempts that failed.
    pub fn failed(&self) -> usize {
        self.evaluated
            .iter()
            .filter(|e| matches!(e.comment, CommentOutcome::Failed(_)))
            .count()
    }

    pub fn count_by_status(&self, status: AggregateStatus) -> usize {
        self.evaluated
            .iter()
            .filter(|e| e.decision.aggregate == status)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluated.is_empty() && self.skipped.is_empty()
    }
}

/// Carry out the comment side of `decision` for a PR at `head_sha`.
///
/// Invokes `create_comment` at most once, and only for a live
/// `PostComment` decision not yet recorded in `ledger`.
pub async fn apply_decision(
    client: &dyn HostingClient,
    ledger: &dyn DecisionLedger,
    decision: &EnforcementDecision,
    head_sha: &str,
) -> CommentOutcome {
    if !decision.action.posts_comment() {
        return CommentOutcome::NotRequired;
    }
    if decision.dry_run {
        return CommentOutcome::DryRun;
    }

    let key = DecisionKey::new(decision.pull_request, head_sha);
    if ledger.already_commented(&key) {
        info!(
            event = "enforcement.deduplicated",
            pull_request = decision.pull_request,
            head_sha = %head_sha,
        );
        return CommentOutcome::Deduplicated;
    }

    match client
        .create_comment(decision.pull_request, enforcement_comment())
        .await
    {
        Ok(id) => {
            ledger.record_comment(key);
            info!(
                event = "enforcement.commented",
                pull_request = decision.pull_request,
                comment_id = id.0,
            );
            CommentOutcome::Posted(id)
        }
        Err(e) => {
            obs::emit_comment_failed(decision.pull_request, &e);
            CommentOutcome::Failed(e.to_string())
        }
    }
}

/// Sequential enforcement over a set of target pull requests.
pub struct EnforcementSweep<'a> {
    client: &'a dyn HostingClient,
    ledger: &'a dyn DecisionLedger,
    dry_run: bool,
}

impl<'a> EnforcementSweep<'a> {
    pub fn new(client: &'a dyn HostingClient, ledger: &'a dyn DecisionLedger, dry_run: bool) -> Self {
        Self {
            client,
            ledger,
            dry_run,
        }
    }

    /// Resolve targets to pull request numbers.
    ///
    /// A failed listing degrades to no targets.
    async fn resolve(&self, targets: EnforcementTargets) -> Vec<u64> {
        match targets {
            EnforcementTargets::Single(number) => vec![number],
            EnforcementTargets::AgentAuthored => match self.client.list_open_pull_requests().await
            {
                Ok(pulls) => pulls
                    .into_iter()
                    .filter(|pr| is_agent_author(&pr.author))
                    .map(|pr| pr.number)
                    .collect(),
                Err(e) => {
                    obs::emit_collaborator_unavailable("list_open_pull_requests", &e);
                    Vec::new()
                }
            },
        }
    }

    pub async fn run(&self, targets: EnforcementTargets) -> SweepReport {
        let sweep_id = obs::new_sweep_id();
        let _span = SweepSpan::enter(&sweep_id);

        let numbers = self.resolve(targets).await;
        obs::emit_sweep_started(self.client.repo(), numbers.len(), self.dry_run);

        let mut report = SweepReport {
            sweep_id,
            ..SweepReport::default()
        };

        for number in numbers {
            let pr = match self.client.get_pull_request(number).await {
                Ok(pr) => pr,
                Err(e) => {
                    obs::emit_collaborator_unavailable("get_pull_request", &e);
                    report.skipped.push(SkippedPullRequest {
                        pull_request: number,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let outcome = self.client.list_checks(&pr.head_sha).await;
            let status = aggregate_outcome(&outcome);
            let listed = outcome.checks().map_or(0, |c| c.len());
            obs::emit_checks_aggregated(pr.number, listed, status);

            let decision = evaluate(pr.number, status, self.dry_run);
            obs::emit_decision(&decision);

            let comment = apply_decision(self.client, self.ledger, &decision, &pr.head_sha).await;
            report.evaluated.push(PullRequestEnforcement {
                pull_request: pr.number,
                author: pr.author,
                head_sha: pr.head_sha,
                decision,
                comment,
                status_text: describe_outcome(&outcome),
            });
        }

        obs::emit_sweep_finished(report.evaluated.len(), report.commented(), report.failed());
        report
    }
}

impl PullRequestEnforcement {
    /// One-line operator summary, e.g. `#39 ✗ failing → comment posted`.
    pub fn summary(&self) -> String {
        let tail = match (&self.decision.action, &self.comment) {
            (_, CommentOutcome::Posted(_)) => "comment posted".to_string(),
            (_, CommentOutcome::DryRun) => "would post comment (dry run)".to_string(),
            (_, CommentOutcome::Deduplicated) => "already commented on this commit".to_string(),
            (_, CommentOutcome::Failed(e)) => format!("comment failed: {}", e),
            (EnforcementAction::ReportPending, _) => "waiting".to_string(),
            (EnforcementAction::ReportUnavailable, _) => "not evaluated".to_string(),
            _ => "no action".to_string(),
        };
        format!(
            "#{} {} {} → {}",
            self.pull_request,
            self.decision.aggregate.icon(),
            self.status_text,
            tail
        )
    }
}
