//! Hosting collaborator trait
//!
//! `HostingClient` is the capability contract the enforcement sweep and the
//! CLI are written against. `GitHubClient` talks to the REST API; the
//! `fakes` module provides an in-memory implementation for tests.

use agentgate_core::ChecksOutcome;
use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Comment, CommentId, CommitStatus, CreatedIssue, Issue, NewIssue, PullRequest};

/// Issue, pull request, check and comment operations on one repository.
#[async_trait]
pub trait HostingClient: Send + Sync {
    /// `owner/name` slug this client is bound to.
    fn repo(&self) -> &str;

    /// Fetch one pull request. `HostingError::NotFound` if absent.
    async fn get_pull_request(&self, number: u64) -> Result<PullRequest>;

    /// Open pull requests (first page).
    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>>;

    /// Open issues, optionally filtered by label. Pull requests are excluded.
    async fn list_open_issues(&self, label: Option<&str>) -> Result<Vec<Issue>>;

    /// Check results for a commit.
    ///
    /// Never fails: an unreachable provider yields
    /// `ChecksOutcome::Unavailable`, an empty listing `Listed(vec![])`.
    async fn list_checks(&self, sha: &str) -> ChecksOutcome;

    /// Legacy commit statuses for a commit.
    async fn list_commit_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>>;

    /// Comments on an issue or pull request.
    async fn list_comments(&self, number: u64) -> Result<Vec<Comment>>;

    /// Post a comment on an issue or pull request.
    async fn create_comment(&self, number: u64, body: &str) -> Result<CommentId>;

    /// Create `name` unless it already exists. Returns whether it was created.
    async fn ensure_label(&self, name: &str, color: &str) -> Result<bool>;

    /// Create an issue.
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue>;
}
