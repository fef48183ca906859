//! agentgate - CI enforcement and snapshot parity for AI coding agents
//!
//! The `agentgate` command files issues for coding agents, watches the pull
//! requests they open and compares visual-regression baselines across
//! platforms.
//!
//! ## Commands
//!
//! - `create-issue` / `batch-create`: file agent issues with test requirements
//! - `list-issues` / `list-prs` / `status`: repository overview
//! - `check-pr`: CI detail for one pull request
//! - `comment-pr` / `enforce-tests`: post test-requirement comments
//! - `parity`: iOS vs Android snapshot parity report

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{warn, Level};

use agentgate_core::{
    aggregate_outcome, describe_outcome, enforcement_comment, parse_task_file, preview, AgentKind,
    AggregateStatus, ChecksOutcome, IssueDraft, MemoryDecisionLedger, PlatformScope,
    DEFAULT_LABEL_COLOR,
};
use agentgate_hosting::{
    Comment, CommentId, CommitStatus, CreatedIssue, EnforcementSweep, EnforcementTargets,
    GitHubClient, HostingClient, HostingConfig, Issue, NewIssue, PullRequest, SweepReport,
};
use agentgate_parity::{
    compare_dirs, write_report, ReportFormat, DEFAULT_EXTENSION, RECORDING_HINTS,
};

const ISSUE_PREVIEW_CHARS: usize = 500;
const COMMENT_PREVIEW_CHARS: usize = 300;
const TEST_KEYWORDS: [&str; 4] = ["test", "pass", "fail", "snapshot"];

#[derive(Parser)]
#[command(name = "agentgate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Manage coding-agent issues, enforce tests on agent PRs and check snapshot parity",
    long_about = None
)]
struct Cli {
    /// Target repository (`owner/name`)
    #[arg(long, global = true, env = "AGENTGATE_REPO")]
    repo: Option<String>,

    /// Preview actions without executing them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an issue and assign it to an agent
    CreateIssue {
        /// Agent to assign (copilot, claude)
        #[arg(long)]
        agent: AgentKind,

        /// Issue title
        #[arg(long)]
        title: String,

        /// Issue body text
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,

        /// File containing the issue body
        #[arg(long)]
        body_file: Option<PathBuf>,

        /// Target platform (ios, android, shared, ci)
        #[arg(long)]
        platform: Option<PlatformScope>,

        /// Acceptance criteria items
        #[arg(long, num_args = 1..)]
        acceptance: Vec<String>,

        /// Additional labels
        #[arg(long, num_args = 1..)]
        labels: Vec<String>,
    },

    /// List open issues
    ListIssues {
        /// Only issues labelled for this agent
        #[arg(long)]
        agent: Option<AgentKind>,
    },

    /// List open pull requests, marking agent-authored ones
    ListPrs,

    /// Show CI status of one pull request
    CheckPr {
        /// Pull request number
        #[arg(long)]
        pr: u64,
    },

    /// Comment on a pull request
    CommentPr {
        /// Pull request number
        #[arg(long)]
        pr: u64,

        /// Comment text
        #[arg(long, conflicts_with = "enforce")]
        body: Option<String>,

        /// Post the test enforcement comment
        #[arg(long)]
        enforce: bool,
    },

    /// Enforce test requirements on agent pull requests
    EnforceTests {
        /// Specific pull request (default: all agent PRs)
        #[arg(long)]
        pr: Option<u64>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Create issues from a JSON task file
    BatchCreate {
        /// JSON task file path
        #[arg(long)]
        file: PathBuf,
    },

    /// Dashboard: issues, pull requests, CI health
    Status {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compare iOS and Android snapshot baselines
    Parity {
        /// iOS baselines directory
        #[arg(long, default_value = "ios/Tests/VisualTests/Snapshots/Baselines")]
        ios_dir: PathBuf,

        /// Android baselines directory
        #[arg(long, default_value = "android/ac-rendering/src/test/snapshots")]
        android_dir: PathBuf,

        /// Report destination
        #[arg(short, long, default_value = "parity-report.html")]
        output: PathBuf,

        #[arg(long, value_enum, default_value_t = ReportFormatArg::Html)]
        format: ReportFormatArg,

        /// Baseline image extension
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormatArg {
    Html,
    Json,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Html => ReportFormat::Html,
            ReportFormatArg::Json => ReportFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    agentgate_core::init_tracing(cli.json, level);

    let repo = cli.repo.as_deref();
    let dry_run = cli.dry_run;

    match cli.command {
        Commands::CreateIssue {
            agent,
            title,
            body,
            body_file,
            platform,
            acceptance,
            labels,
        } => {
            let body = match (body, body_file) {
                (Some(body), _) => body,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read body file: {:?}", path))?,
                (None, None) => String::new(),
            };
            let draft = IssueDraft::new(agent, title)
                .with_body(body)
                .with_platform(platform)
                .with_acceptance(acceptance)
                .with_labels(labels);
            cmd_create_issue(&connect(repo)?, &draft, dry_run)
                .await
                .map(|_| ())
        }
        Commands::ListIssues { agent } => cmd_list_issues(&connect(repo)?, agent).await,
        Commands::ListPrs => cmd_list_prs(&connect(repo)?).await,
        Commands::CheckPr { pr } => cmd_check_pr(&connect(repo)?, pr).await,
        Commands::CommentPr { pr, body, enforce } => {
            cmd_comment_pr(&connect(repo)?, pr, body, enforce, dry_run)
                .await
                .map(|_| ())
        }
        Commands::EnforceTests { pr, format } => {
            cmd_enforce_tests(&connect(repo)?, pr, dry_run, format)
                .await
                .map(|_| ())
        }
        Commands::BatchCreate { file } => cmd_batch_create(&connect(repo)?, &file, dry_run)
            .await
            .map(|_| ()),
        Commands::Status { format } => cmd_status(&connect(repo)?, format).await,
        Commands::Parity {
            ios_dir,
            android_dir,
            output,
            format,
            extension,
        } => cmd_parity(&ios_dir, &android_dir, &output, format.into(), &extension),
    }
}

fn connect(repo: Option<&str>) -> Result<GitHubClient> {
    let mut config = HostingConfig::from_env();
    if let Some(repo) = repo {
        config = config.with_repo(repo);
    }
    GitHubClient::new(config).context("Failed to configure GitHub client")
}

/// Truncate a string for display without splitting a character
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

// ========== Issues ==========

/// File one agent issue. Returns `None` in dry-run mode.
async fn cmd_create_issue(
    client: &dyn HostingClient,
    draft: &IssueDraft,
    dry_run: bool,
) -> Result<Option<CreatedIssue>> {
    let body = draft.render_body();
    let labels = draft.labels();
    let profile = draft.agent.profile();

    println!("Creating issue on {}...", client.repo());
    println!("  Title: {}", draft.title);
    println!("  Agent: {}", profile.description);
    println!("  Labels: {}", labels.join(", "));

    if dry_run {
        println!("\n[DRY RUN] Would create issue with body:");
        println!("{}", preview(&body, ISSUE_PREVIEW_CHARS));
        return Ok(None);
    }

    for label in &labels {
        if let Err(e) = client.ensure_label(label, DEFAULT_LABEL_COLOR).await {
            warn!(event = "label.ensure_failed", label = %label, error = %e);
        }
    }

    let created = client
        .create_issue(&NewIssue {
            title: draft.title.clone(),
            body,
            labels,
        })
        .await
        .with_context(|| format!("Failed to create issue: {}", draft.title))?;

    println!("  ✓ Created: {}", created.html_url);
    println!(
        "  Issue #{} assigned to {}",
        created.number, profile.description
    );
    Ok(Some(created))
}

/// File every task of a task file. Returns how many issues were created.
async fn cmd_batch_create(client: &dyn HostingClient, file: &Path, dry_run: bool) -> Result<usize> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Task file not found: {:?}", file))?;
    let batch =
        parse_task_file(&content).with_context(|| format!("Invalid task file: {:?}", file))?;

    for skipped in &batch.skipped {
        println!("  ⚠ Skipped: {}", skipped);
    }

    let total = batch.drafts.len();
    println!("Creating {} issues...", total);

    let mut created = 0;
    for (i, draft) in batch.drafts.iter().enumerate() {
        println!("\n[{}/{}] {}", i + 1, total, draft.title);
        match cmd_create_issue(client, draft, dry_run).await {
            Ok(Some(_)) => created += 1,
            Ok(None) => {}
            Err(e) => {
                warn!(event = "batch.task_failed", title = %draft.title, error = %format!("{:#}", e));
                println!("  ✗ {:#}", e);
            }
        }
    }
    Ok(created)
}

async fn cmd_list_issues(client: &dyn HostingClient, agent: Option<AgentKind>) -> Result<()> {
    let label = agent.map(|a| a.profile().label);
    let issues = client
        .list_open_issues(label)
        .await
        .context("Failed to list issues")?;
    println!("{}", render_issue_table(client.repo(), &issues));
    Ok(())
}

fn render_issue_table(repo: &str, issues: &[Issue]) -> String {
    if issues.is_empty() {
        return "No open issues found.".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("\nOpen issues on {}:\n", repo));
    out.push_str(&format!("{:<6} {:<20} {}\n", "#", "Labels", "Title"));
    out.push_str(&format!("{}\n", "-".repeat(70)));
    for issue in issues {
        out.push_str(&format!(
            "#{:<5} {:<20} {}\n",
            issue.number,
            issue.labels.join(", "),
            truncate(&issue.title, 50)
        ));
    }
    out
}

// ========== Pull requests ==========

async fn cmd_list_prs(client: &dyn HostingClient) -> Result<()> {
    let pulls = client
        .list_open_pull_requests()
        .await
        .context("Failed to list pull requests")?;
    println!("{}", render_pr_table(client.repo(), &pulls));
    Ok(())
}

fn render_pr_table(repo: &str, pulls: &[PullRequest]) -> String {
    if pulls.is_empty() {
        return "No open PRs found.".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("\nOpen PRs on {}:\n", repo));
    out.push_str(&format!(
        "{:<6} {:<20} {:<40} {}\n",
        "#", "Author", "Branch", "Title"
    ));
    out.push_str(&format!("{}\n", "-".repeat(100)));
    for pr in pulls {
        let author = match AgentKind::from_author(&pr.author) {
            Some(agent) => format!("{} {}", pr.author, agent.marker()),
            None => pr.author.clone(),
        };
        out.push_str(&format!(
            "#{:<5} {:<20} {:<40} {}\n",
            pr.number,
            author,
            truncate(&pr.head_ref, 38),
            truncate(&pr.title, 40)
        ));
    }
    out
}

/// Everything `check-pr` shows about one pull request.
struct PrCheckReport {
    pull_request: PullRequest,
    checks: ChecksOutcome,
    statuses: Vec<CommitStatus>,
    test_comments: Vec<Comment>,
    aggregate: AggregateStatus,
}

fn is_test_related(body: &str) -> bool {
    let body = body.to_lowercase();
    TEST_KEYWORDS.iter().any(|k| body.contains(k))
}

async fn build_pr_check(client: &dyn HostingClient, number: u64) -> Result<PrCheckReport> {
    let pull_request = client
        .get_pull_request(number)
        .await
        .with_context(|| format!("PR #{} not found", number))?;

    let checks = client.list_checks(&pull_request.head_sha).await;
    let aggregate = aggregate_outcome(&checks);

    let statuses = client
        .list_commit_statuses(&pull_request.head_sha)
        .await
        .unwrap_or_else(|e| {
            warn!(event = "collaborator.unavailable", operation = "list_commit_statuses", error = %e);
            Vec::new()
        });

    let test_comments = client
        .list_comments(number)
        .await
        .unwrap_or_else(|e| {
            warn!(event = "collaborator.unavailable", operation = "list_comments", error = %e);
            Vec::new()
        })
        .into_iter()
        .filter(|c| is_test_related(&c.body))
        .collect();

    Ok(PrCheckReport {
        pull_request,
        checks,
        statuses,
        test_comments,
        aggregate,
    })
}

fn render_pr_check_text(report: &PrCheckReport) -> String {
    let pr = &report.pull_request;
    let mut out = String::new();
    out.push_str(&format!("\nPR #{}: {}\n", pr.number, pr.title));
    out.push_str(&format!("  Author: {}\n", pr.author));
    out.push_str(&format!("  Branch: {}\n", pr.head_ref));
    out.push_str(&format!(
        "  State:  {}{}\n",
        pr.state,
        if pr.draft { " (draft)" } else { "" }
    ));
    out.push_str(&format!(
        "  Merge:  {}\n",
        if pr.mergeable == Some(true) {
            "mergeable"
        } else {
            "not mergeable / unknown"
        }
    ));

    match &report.checks {
        ChecksOutcome::Listed(checks) if checks.is_empty() => {
            out.push_str("\n  No CI checks found.\n");
        }
        ChecksOutcome::Listed(checks) => {
            out.push_str(&format!("\n  CI Status ({} checks):\n", checks.len()));
            for check in checks {
                out.push_str(&format!(
                    "    {} {}: {}\n",
                    check.conclusion.icon(),
                    check.name,
                    check.conclusion
                ));
            }
        }
        ChecksOutcome::Unavailable(reason) => {
            out.push_str(&format!("\n  CI status unavailable: {}\n", reason));
        }
    }

    if !report.statuses.is_empty() {
        out.push_str("\n  Commit Statuses:\n");
        for status in &report.statuses {
            out.push_str(&format!(
                "    {} {}: {}\n",
                status.conclusion().icon(),
                status.context,
                status.state
            ));
        }
    }

    out.push_str(&format!(
        "\n  Aggregate: {} {}\n",
        report.aggregate.icon(),
        describe_outcome(&report.checks)
    ));

    if !report.test_comments.is_empty() {
        out.push_str("\n  Test-related comments:\n");
        for comment in &report.test_comments {
            out.push_str(&format!(
                "    @{}: {}\n",
                comment.author,
                preview(&comment.body.replace('\n', " "), 80)
            ));
        }
    }
    out
}

async fn cmd_check_pr(client: &dyn HostingClient, number: u64) -> Result<()> {
    let report = build_pr_check(client, number).await?;
    println!("{}", render_pr_check_text(&report));
    Ok(())
}

/// Post a free-form or enforcement comment. Returns `None` in dry-run mode.
async fn cmd_comment_pr(
    client: &dyn HostingClient,
    number: u64,
    body: Option<String>,
    enforce: bool,
    dry_run: bool,
) -> Result<Option<CommentId>> {
    let body = match (body, enforce) {
        (Some(body), _) => body,
        (None, true) => enforcement_comment().to_string(),
        (None, false) => bail!("Must provide --body or --enforce"),
    };

    if dry_run {
        println!("[DRY RUN] Would comment on PR #{}:", number);
        println!("{}", preview(&body, COMMENT_PREVIEW_CHARS));
        return Ok(None);
    }

    let id = client
        .create_comment(number, &body)
        .await
        .with_context(|| format!("Failed to comment on PR #{}", number))?;
    println!("  ✓ Comment posted on PR #{}", number);
    Ok(Some(id))
}

// ========== Enforcement ==========

async fn cmd_enforce_tests(
    client: &dyn HostingClient,
    pr: Option<u64>,
    dry_run: bool,
    format: OutputFormat,
) -> Result<SweepReport> {
    let ledger = MemoryDecisionLedger::new();
    let targets = pr.map_or(EnforcementTargets::AgentAuthored, EnforcementTargets::Single);
    let report = EnforcementSweep::new(client, &ledger, dry_run)
        .run(targets)
        .await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => println!("{}", render_sweep_text(&report, targets)),
    }
    Ok(report)
}

fn render_sweep_text(report: &SweepReport, targets: EnforcementTargets) -> String {
    if report.is_empty() && targets == EnforcementTargets::AgentAuthored {
        return "No agent PRs found.".to_string();
    }

    let mut out = String::new();
    for pr in &report.evaluated {
        out.push_str(&format!("{} (@{})\n", pr.summary(), pr.author));
    }
    for skipped in &report.skipped {
        out.push_str(&format!(
            "#{} skipped: {}\n",
            skipped.pull_request, skipped.reason
        ));
    }
    out.push_str(&format!(
        "\nEvaluated {} PR(s): {} commented, {} comment failure(s), {} skipped",
        report.evaluated.len(),
        report.commented(),
        report.failed(),
        report.skipped.len()
    ));
    out
}

// ========== Status ==========

/// One open pull request in the status dashboard.
#[derive(Debug, Serialize)]
struct PrStatusLine {
    number: u64,
    author: String,
    title: String,
    draft: bool,
    agent: Option<AgentKind>,
    status: AggregateStatus,
    #[serde(skip)]
    status_text: &'static str,
}

#[derive(Debug, Serialize)]
struct StatusSummary {
    repo: String,
    open_issues: usize,
    issues_by_agent: BTreeMap<String, usize>,
    agent_pull_requests: usize,
    pull_requests: Vec<PrStatusLine>,
    generated_at: DateTime<Utc>,
}

async fn build_status(client: &dyn HostingClient, now: DateTime<Utc>) -> StatusSummary {
    let issues = client.list_open_issues(None).await.unwrap_or_else(|e| {
        warn!(event = "collaborator.unavailable", operation = "list_open_issues", error = %e);
        Vec::new()
    });
    let issues_by_agent = AgentKind::ALL
        .iter()
        .map(|agent| {
            let label = agent.profile().label;
            let count = issues.iter().filter(|i| i.has_label(label)).count();
            (agent.name().to_string(), count)
        })
        .collect();

    let pulls = client.list_open_pull_requests().await.unwrap_or_else(|e| {
        warn!(event = "collaborator.unavailable", operation = "list_open_pull_requests", error = %e);
        Vec::new()
    });

    let mut pull_requests = Vec::with_capacity(pulls.len());
    for pr in pulls {
        let outcome = client.list_checks(&pr.head_sha).await;
        let status = aggregate_outcome(&outcome);
        pull_requests.push(PrStatusLine {
            number: pr.number,
            agent: AgentKind::from_author(&pr.author),
            author: pr.author,
            title: pr.title,
            draft: pr.draft,
            status,
            status_text: describe_outcome(&outcome),
        });
    }

    StatusSummary {
        repo: client.repo().to_string(),
        open_issues: issues.len(),
        issues_by_agent,
        agent_pull_requests: pull_requests.iter().filter(|p| p.agent.is_some()).count(),
        pull_requests,
        generated_at: now,
    }
}

fn render_status_text(summary: &StatusSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== agentgate status for {} ===\n\n", summary.repo));
    out.push_str(&format!("Open Issues: {} total\n", summary.open_issues));
    for agent in AgentKind::ALL {
        let count = summary
            .issues_by_agent
            .get(agent.name())
            .copied()
            .unwrap_or(0);
        out.push_str(&format!("  {} {}: {}\n", agent.marker(), agent.name(), count));
    }

    if summary.pull_requests.is_empty() {
        out.push_str("\nNo open PRs.\n");
    } else {
        out.push_str(&format!(
            "\nOpen PRs: {} total ({} from agents)\n",
            summary.pull_requests.len(),
            summary.agent_pull_requests
        ));
        for pr in &summary.pull_requests {
            out.push_str(&format!(
                "  #{} [{} {}] {}: {}{}\n",
                pr.number,
                pr.status.icon(),
                pr.status_text,
                pr.author,
                truncate(&pr.title, 50),
                if pr.draft { " (draft)" } else { "" }
            ));
        }
    }

    out.push_str(&format!("\nTimestamp: {}", summary.generated_at.to_rfc3339()));
    out
}

async fn cmd_status(client: &dyn HostingClient, format: OutputFormat) -> Result<()> {
    let summary = build_status(client, Utc::now()).await;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => println!("{}", render_status_text(&summary)),
    }
    Ok(())
}

// ========== Parity ==========

fn cmd_parity(
    ios_dir: &Path,
    android_dir: &Path,
    output: &Path,
    format: ReportFormat,
    extension: &str,
) -> Result<()> {
    let comparison = compare_dirs(ios_dir, android_dir, extension);

    if comparison.both_empty {
        println!("{}", RECORDING_HINTS);
        return Ok(());
    }

    write_report(output, &comparison.report, format)
        .with_context(|| format!("Error writing report to {:?}", output))?;

    let counts = comparison.report.counts;
    println!("Report generated: {}", output.display());
    println!("  Both platforms: {}", counts.matched);
    println!("  iOS only: {}", counts.a_only);
    println!("  Android only: {}", counts.b_only);
    if !comparison.skipped.is_empty() {
        println!("  ⚠ Skipped baselines: {}", comparison.skipped.len());
    }
    if comparison.walk_errors > 0 {
        println!("  ⚠ Unreadable entries: {}", comparison.walk_errors);
    }
    Ok(())
}
