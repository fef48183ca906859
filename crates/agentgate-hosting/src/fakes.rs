//! In-memory fake for the hosting collaborator (testing only)
//!
//! `MemoryHostingClient` satisfies the [`HostingClient`] contract without
//! any network access and counts collaborator calls so tests can assert on
//! side effects (e.g. zero comment calls in dry-run mode).

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use agentgate_core::{CheckResult, ChecksOutcome};
use async_trait::async_trait;

use crate::client::HostingClient;
use crate::error::{HostingError, Result};
use crate::model::{Comment, CommentId, CommitStatus, CreatedIssue, Issue, NewIssue, PullRequest};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// In-memory repository state.
#[derive(Debug)]
pub struct MemoryHostingClient {
    repo: String,
    pulls: Mutex<BTreeMap<u64, PullRequest>>,
    issues: Mutex<Vec<Issue>>,
    checks: Mutex<HashMap<String, ChecksOutcome>>,
    statuses: Mutex<HashMap<String, Vec<CommitStatus>>>,
    comments: Mutex<BTreeMap<u64, Vec<Comment>>>,
    labels: Mutex<BTreeSet<String>>,
    created_issues: Mutex<Vec<NewIssue>>,
    comment_calls: AtomicUsize,
    fail_comments: AtomicBool,
    pulls_unavailable: AtomicBool,
    next_id: AtomicUsize,
}

impl Default for MemoryHostingClient {
    fn default() -> Self {
        Self::new("octo/fake")
    }
}

impl MemoryHostingClient {
    pub fn new(repo: &str) -> Self {
        Self {
            repo: repo.to_string(),
            pulls: Mutex::new(BTreeMap::new()),
            issues: Mutex::new(Vec::new()),
            checks: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
            comments: Mutex::new(BTreeMap::new()),
            labels: Mutex::new(BTreeSet::new()),
            created_issues: Mutex::new(Vec::new()),
            comment_calls: AtomicUsize::new(0),
            fail_comments: AtomicBool::new(false),
            pulls_unavailable: AtomicBool::new(false),
            next_id: AtomicUsize::new(1),
        }
    }

    /// Add an open pull request authored by `author` at `head_sha`.
    pub fn add_pull_request(&self, number: u64, author: &str, head_sha: &str) {
        let pr = PullRequest {
            number,
            title: format!("PR {}", number),
            author: author.to_string(),
            head_ref: format!("branch-{}", number),
            head_sha: head_sha.to_string(),
            state: "open".to_string(),
            draft: false,
            mergeable: Some(true),
        };
        lock(&self.pulls).insert(number, pr);
    }

    /// Move a pull request's head to a new commit.
    pub fn push_commit(&self, number: u64, head_sha: &str) {
        if let Some(pr) = lock(&self.pulls).get_mut(&number) {
            pr.head_sha = head_sha.to_string();
        }
    }

    pub fn set_checks(&self, sha: &str, checks: Vec<CheckResult>) {
        lock(&self.checks).insert(sha.to_string(), ChecksOutcome::Listed(checks));
    }

    pub fn set_checks_unavailable(&self, sha: &str, reason: &str) {
        lock(&self.checks).insert(
            sha.to_string(),
            ChecksOutcome::Unavailable(reason.to_string()),
        );
    }

    pub fn set_statuses(&self, sha: &str, statuses: Vec<CommitStatus>) {
        lock(&self.statuses).insert(sha.to_string(), statuses);
    }

    pub fn add_issue(&self, number: u64, title: &str, labels: &[&str]) {
        lock(&self.issues).push(Issue {
            number,
            title: title.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        });
    }

    pub fn add_label(&self, name: &str) {
        lock(&self.labels).insert(name.to_string());
    }

    /// Make every `create_comment` call fail.
    pub fn fail_comments(&self, fail: bool) {
        self.fail_comments.store(fail, Ordering::SeqCst);
    }

    /// Make pull request listing fail as if the API were down.
    pub fn pulls_unavailable(&self, unavailable: bool) {
        self.pulls_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `create_comment` invocations, including failed ones.
    pub fn comment_calls(&self) -> usize {
        self.comment_calls.load(Ordering::SeqCst)
    }

    pub fn comments_on(&self, number: u64) -> Vec<Comment> {
        lock(&self.comments)
            .get(&number)
            .cloned()
            .unwrap_or_default()
    }

    pub fn labels(&self) -> Vec<String> {
        lock(&self.labels).iter().cloned().collect()
    }

    pub fn created_issues(&self) -> Vec<NewIssue> {
        lock(&self.created_issues).clone()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) as u64
    }
}

#[async_trait]
impl HostingClient for MemoryHostingClient {
    fn repo(&self) -> &str {
        &self.repo
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        lock(&self.pulls)
            .get(&number)
            .cloned()
            .ok_or_else(|| HostingError::NotFound(format!("pull request #{}", number)))
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>> {
        if self.pulls_unavailable.load(Ordering::SeqCst) {
            return Err(HostingError::Timeout);
        }
        Ok(lock(&self.pulls)
            .values()
            .filter(|pr| pr.state == "open")
            .cloned()
            .collect())
    }

    async fn list_open_issues(&self, label: Option<&str>) -> Result<Vec<Issue>> {
        Ok(lock(&self.issues)
            .iter()
            .filter(|i| label.map_or(true, |l| i.has_label(l)))
            .cloned()
            .collect())
    }

    async fn list_checks(&self, sha: &str) -> ChecksOutcome {
        lock(&self.checks)
            .get(sha)
            .cloned()
            .unwrap_or(ChecksOutcome::Listed(Vec::new()))
    }

    async fn list_commit_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>> {
        Ok(lock(&self.statuses)
            .get(sha)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_comments(&self, number: u64) -> Result<Vec<Comment>> {
        Ok(self.comments_on(number))
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<CommentId> {
        self.comment_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_comments.load(Ordering::SeqCst) {
            return Err(HostingError::Status {
                method: "POST".to_string(),
                url: format!("issues/{}/comments", number),
                status: 502,
                message: "Bad Gateway".to_string(),
            });
        }

        let id = self.next_id();
        lock(&self.comments)
            .entry(number)
            .or_default()
            .push(Comment {
                id,
                author: "agentgate".to_string(),
                body: body.to_string(),
            });
        Ok(CommentId(id))
    }

    async fn ensure_label(&self, name: &str, _color: &str) -> Result<bool> {
        Ok(lock(&self.labels).insert(name.to_string()))
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue> {
        let number = self.next_id();
        lock(&self.created_issues).push(issue.clone());
        lock(&self.issues).push(Issue {
            number,
            title: issue.title.clone(),
            labels: issue.labels.clone(),
        });
        Ok(CreatedIssue {
            number,
            html_url: format!("https://github.com/{}/issues/{}", self.repo, number),
        })
    }
}
