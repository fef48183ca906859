//! Hosting-platform records and their wire shapes.

use agentgate_core::{CheckResult, Conclusion, MalformedInput};
use serde::{Deserialize, Serialize};

/// An open or closed pull request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub head_ref: String,
    pub head_sha: String,
    pub state: String,
    pub draft: bool,
    pub mergeable: Option<bool>,
}

/// An issue, excluding pull requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub labels: Vec<String>,
}

impl Issue {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A legacy commit status (context + state).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitStatus {
    pub context: String,
    pub state: String,
}

impl CommitStatus {
    pub fn conclusion(&self) -> Conclusion {
        Conclusion::from_status_state(&self.state)
    }
}

/// A comment on an issue or pull request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub body: String,
}

/// Issue to be created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Result of creating an issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedIssue {
    pub number: u64,
    pub html_url: String,
}

/// Identifier of a created comment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CommentId(pub u64);

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Wire shapes (GitHub REST v3)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct WireUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireHead {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePull {
    pub number: u64,
    pub title: String,
    pub user: WireUser,
    pub head: WireHead,
    pub state: String,
    #[serde(default)]
    pub draft: bool,
    pub mergeable: Option<bool>,
}

impl From<WirePull> for PullRequest {
    fn from(w: WirePull) -> Self {
        PullRequest {
            number: w.number,
            title: w.title,
            author: w.user.login,
            head_ref: w.head.ref_name,
            head_sha: w.head.sha,
            state: w.state,
            draft: w.draft,
            mergeable: w.mergeable,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLabel {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireIssue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub labels: Vec<WireLabel>,
    pub pull_request: Option<serde_json::Value>,
}

impl WireIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

impl From<WireIssue> for Issue {
    fn from(w: WireIssue) -> Self {
        Issue {
            number: w.number,
            title: w.title,
            labels: w.labels.into_iter().map(|l| l.name).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCheckRun {
    pub name: Option<String>,
    pub status: Option<String>,
    pub conclusion: Option<String>,
}

impl WireCheckRun {
    pub fn into_check(self) -> Result<CheckResult, MalformedInput> {
        CheckResult::from_parts(
            self.name.as_deref(),
            self.conclusion.as_deref(),
            self.status.as_deref(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCheckRuns {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub check_runs: Vec<WireCheckRun>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCombinedStatus {
    #[serde(default)]
    pub statuses: Vec<CommitStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireComment {
    pub id: u64,
    pub user: WireUser,
    #[serde(default)]
    pub body: String,
}

impl From<WireComment> for Comment {
    fn from(w: WireComment) -> Self {
        Comment {
            id: w.id,
            author: w.user.login,
            body: w.body,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCreated {
    pub id: u64,
    pub number: Option<u64>,
    #[serde(default)]
    pub html_url: String,
}
