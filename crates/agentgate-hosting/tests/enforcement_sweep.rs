//! Integration tests for the enforcement sweep with MemoryHostingClient.

use agentgate_core::{
    AggregateStatus, CheckResult, Conclusion, EnforcementAction, MemoryDecisionLedger,
    NoopDecisionLedger,
};
use agentgate_hosting::fakes::MemoryHostingClient;
use agentgate_hosting::{CommentOutcome, EnforcementSweep, EnforcementTargets};

fn failing() -> Vec<CheckResult> {
    vec![
        CheckResult::new("build", Conclusion::Success),
        CheckResult::new("snapshot-tests", Conclusion::Failure),
    ]
}

fn passing() -> Vec<CheckResult> {
    vec![
        CheckResult::new("build", Conclusion::Success),
        CheckResult::new("snapshot-tests", Conclusion::Success),
    ]
}

/// Test: dry-run never touches the comment collaborator
#[tokio::test]
async fn test_dry_run_makes_zero_comment_calls() {
    let client = MemoryHostingClient::default();
    client.add_pull_request(39, "copilot-swe-agent", "abc123");
    client.set_checks("abc123", failing());
    let ledger = MemoryDecisionLedger::new();

    let report = EnforcementSweep::new(&client, &ledger, true)
        .run(EnforcementTargets::Single(39))
        .await;

    assert_eq!(report.evaluated.len(), 1);
    let pr = &report.evaluated[0];
    assert_eq!(pr.decision.action, EnforcementAction::PostComment);
    assert!(pr.decision.dry_run);
    assert_eq!(pr.comment, CommentOutcome::DryRun);
    assert_eq!(client.comment_calls(), 0, "dry run must not comment");
    assert!(ledger.is_empty());
}

/// Test: a live failing PR gets exactly one comment with the template
#[tokio::test]
async fn test_live_failing_posts_exactly_once() {
    let client = MemoryHostingClient::default();
    client.add_pull_request(39, "copilot-swe-agent", "abc123");
    client.set_checks("abc123", failing());
    let ledger = MemoryDecisionLedger::new();

    let report = EnforcementSweep::new(&client, &ledger, false)
        .run(EnforcementTargets::Single(39))
        .await;

    assert_eq!(client.comment_calls(), 1);
    assert_eq!(report.commented(), 1);
    assert!(matches!(report.evaluated[0].comment, CommentOutcome::Posted(_)));

    let comments = client.comments_on(39);
    assert_eq!(comments.len(), 1);
    assert!(comments[0].body.contains("Test Requirements Not Met"));
}

/// Test: passing and pending PRs never post
#[tokio::test]
async fn test_non_failing_never_posts() {
    let client = MemoryHostingClient::default();
    client.add_pull_request(1, "copilot-swe-agent", "p1");
    client.add_pull_request(2, "copilot-swe-agent", "p2");
    client.add_pull_request(3, "copilot-swe-agent", "p3");
    client.set_checks("p1", passing());
    client.set_checks(
        "p2",
        vec![
            CheckResult::new("build", Conclusion::Success),
            CheckResult::new("ui-tests", Conclusion::Pending),
        ],
    );
    // p3 has no checks at all
    let ledger = MemoryDecisionLedger::new();

    let report = EnforcementSweep::new(&client, &ledger, false)
        .run(EnforcementTargets::AgentAuthored)
        .await;

    assert_eq!(report.evaluated.len(), 3);
    assert_eq!(report.count_by_status(AggregateStatus::Passing), 1);
    assert_eq!(report.count_by_status(AggregateStatus::Pending), 1);
    assert_eq!(report.count_by_status(AggregateStatus::NoChecks), 1);
    assert!(report
        .evaluated
        .iter()
        .all(|e| e.comment == CommentOutcome::NotRequired));
    assert_eq!(client.comment_calls(), 0);
}

/// Test: the same ledger suppresses a second comment on an unchanged head
#[tokio::test]
async fn test_repeat_sweep_is_deduplicated() {
    let client = MemoryHostingClient::default();
    client.add_pull_request(39, "copilot-swe-agent", "abc123");
    client.set_checks("abc123", failing());
    let ledger = MemoryDecisionLedger::new();
    let sweep = EnforcementSweep::new(&client, &ledger, false);

    sweep.run(EnforcementTargets::Single(39)).await;
    let second = sweep.run(EnforcementTargets::Single(39)).await;

    assert_eq!(second.evaluated[0].comment, CommentOutcome::Deduplicated);
    assert_eq!(client.comment_calls(), 1);
    assert_eq!(client.comments_on(39).len(), 1);
}

/// Test: a new head commit re-arms enforcement
#[tokio::test]
async fn test_new_commit_rearms_enforcement() {
    let client = MemoryHostingClient::default();
    client.add_pull_request(39, "copilot-swe-agent", "abc123");
    client.set_checks("abc123", failing());
    let ledger = MemoryDecisionLedger::new();
    let sweep = EnforcementSweep::new(&client, &ledger, false);

    sweep.run(EnforcementTargets::Single(39)).await;

    client.push_commit(39, "def456");
    client.set_checks("def456", failing());
    let second = sweep.run(EnforcementTargets::Single(39)).await;

    assert!(matches!(second.evaluated[0].comment, CommentOutcome::Posted(_)));
    assert_eq!(client.comment_calls(), 2);
    assert_eq!(ledger.len(), 2);
}

/// Test: without a remembering ledger every failing sweep posts again
#[tokio::test]
async fn test_noop_ledger_posts_every_sweep() {
    let client = MemoryHostingClient::default();
    client.add_pull_request(39, "copilot-swe-agent", "abc123");
    client.set_checks("abc123", failing());
    let ledger = NoopDecisionLedger;
    let sweep = EnforcementSweep::new(&client, &ledger, false);

    sweep.run(EnforcementTargets::Single(39)).await;
    sweep.run(EnforcementTargets::Single(39)).await;

    assert_eq!(client.comment_calls(), 2);
    assert_eq!(client.comments_on(39).len(), 2);
}

/// Test: a comment failure on one PR does not stop the sweep
#[tokio::test]
async fn test_comment_failure_continues_to_next_pr() {
    let client = MemoryHostingClient::default();
    client.add_pull_request(10, "copilot-swe-agent", "s10");
    client.add_pull_request(11, "claude", "s11");
    client.set_checks("s10", failing());
    client.set_checks("s11", failing());
    client.fail_comments(true);
    let ledger = MemoryDecisionLedger::new();

    let report = EnforcementSweep::new(&client, &ledger, false)
        .run(EnforcementTargets::AgentAuthored)
        .await;

    assert_eq!(report.evaluated.len(), 2);
    assert_eq!(report.failed(), 2);
    assert_eq!(client.comment_calls(), 2);
    assert!(ledger.is_empty(), "failed comments must not be recorded");
}

/// Test: a missing PR is skipped, not fatal
#[tokio::test]
async fn test_missing_pr_is_skipped() {
    let client = MemoryHostingClient::default();
    let ledger = MemoryDecisionLedger::new();

    let report = EnforcementSweep::new(&client, &ledger, false)
        .run(EnforcementTargets::Single(404))
        .await;

    assert!(report.evaluated.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].pull_request, 404);
    assert_eq!(client.comment_calls(), 0);
}

/// Test: an unreachable check provider is reported, never commented on
#[tokio::test]
async fn test_unavailable_checks_are_informational() {
    let client = MemoryHostingClient::default();
    client.add_pull_request(39, "copilot-swe-agent", "abc123");
    client.set_checks_unavailable("abc123", "request timed out");
    let ledger = MemoryDecisionLedger::new();

    let report = EnforcementSweep::new(&client, &ledger, false)
        .run(EnforcementTargets::Single(39))
        .await;

    let pr = &report.evaluated[0];
    assert_eq!(pr.decision.aggregate, AggregateStatus::Unavailable);
    assert_eq!(pr.decision.action, EnforcementAction::ReportUnavailable);
    assert_eq!(pr.comment, CommentOutcome::NotRequired);
    assert_eq!(client.comment_calls(), 0);
}

/// Test: only agent-authored PRs are swept when no PR is given
#[tokio::test]
async fn test_agent_authored_filter() {
    let client = MemoryHostingClient::default();
    client.add_pull_request(1, "copilot-swe-agent", "a");
    client.add_pull_request(2, "octocat", "b");
    client.add_pull_request(3, "claude", "c");
    let ledger = MemoryDecisionLedger::new();

    let report = EnforcementSweep::new(&client, &ledger, true)
        .run(EnforcementTargets::AgentAuthored)
        .await;

    let numbers: Vec<u64> = report.evaluated.iter().map(|e| e.pull_request).collect();
    assert_eq!(numbers, vec![1, 3]);
}

/// Test: a failed PR listing degrades to an empty sweep
#[tokio::test]
async fn test_listing_failure_yields_empty_report() {
    let client = MemoryHostingClient::default();
    client.add_pull_request(1, "copilot-swe-agent", "a");
    client.pulls_unavailable(true);
    let ledger = MemoryDecisionLedger::new();

    let report = EnforcementSweep::new(&client, &ledger, false)
        .run(EnforcementTargets::AgentAuthored)
        .await;

    assert!(report.is_empty());
    assert!(!report.sweep_id.is_empty());
}
