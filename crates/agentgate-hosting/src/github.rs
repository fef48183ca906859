//! GitHub REST client
//!
//! Implements [`HostingClient`] against the GitHub v3 REST API using a
//! shared `reqwest::Client`. Every request carries the configured timeout;
//! there are no retries.

use agentgate_core::obs::emit_collaborator_unavailable;
use agentgate_core::{CheckResult, ChecksOutcome};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::client::HostingClient;
use crate::config::HostingConfig;
use crate::error::{HostingError, Result};
use crate::model::{
    Comment, CommentId, CommitStatus, CreatedIssue, Issue, NewIssue, PullRequest, WireCheckRun,
    WireCheckRuns, WireComment, WireCombinedStatus, WireCreated, WireIssue, WirePull,
};

const PAGE_SIZE: u32 = 50;
/// Largest page the check-runs endpoint serves.
const CHECK_RUNS_PAGE_SIZE: usize = 100;
const MAX_CHECK_RUN_PAGES: u32 = 10;
const USER_AGENT: &str = concat!("agentgate/", env!("CARGO_PKG_VERSION"));

/// GitHub client bound to one repository
pub struct GitHubClient {
    config: HostingConfig,
    http_client: reqwest::Client,
}

impl GitHubClient {
    /// Create a new client
    pub fn new(config: HostingConfig) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;

        Ok(GitHubClient {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.config.api_url, self.config.repo, path)
    }

    /// `labels/{name}` with the name percent-encoded as one path segment.
    fn label_url(&self, name: &str) -> Result<String> {
        let mut url = Url::parse(&self.url("labels"))
            .map_err(|e| HostingError::NotConfigured(format!("invalid API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| HostingError::NotConfigured("API URL cannot take a path".to_string()))?
            .push(name);
        Ok(url.into())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        debug!(method = %method, url = %url, "hosting request");
        let mut builder = self.request(method.clone(), url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(HostingError::NotFound(url.to_string()));
        }

        let message = response.text().await.unwrap_or_default();
        Err(HostingError::Status {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            message: message.trim().to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_json_query(url, &[]).await
    }

    async fn get_json_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.send(Method::GET, url, query, None).await?;
        Ok(response.json::<T>().await?)
    }

    async fn post_json<T: DeserializeOwned>(&self, url: &str, body: serde_json::Value) -> Result<T> {
        let response = self.send(Method::POST, url, &[], Some(body)).await?;
        Ok(response.json::<T>().await?)
    }

    /// Every check run on `sha`, following pages up to the advertised total.
    async fn fetch_check_runs(&self, sha: &str) -> Result<Vec<WireCheckRun>> {
        let url = self.url(&format!("commits/{}/check-runs", sha));
        let mut runs = Vec::new();
        let mut page = 1;
        loop {
            let wire: WireCheckRuns = self
                .get_json_query(
                    &url,
                    &[
                        ("per_page", CHECK_RUNS_PAGE_SIZE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;
            let page_len = wire.check_runs.len();
            runs.extend(wire.check_runs);

            match next_check_page(wire.total_count, runs.len(), page_len, page) {
                PageStep::Done => return Ok(runs),
                PageStep::Next => page += 1,
                PageStep::Truncated => {
                    return Err(HostingError::Incomplete {
                        received: runs.len(),
                        total: wire.total_count.unwrap_or(runs.len() as u64),
                    })
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageStep {
    Done,
    Next,
    Truncated,
}

/// Decide whether the check-run listing is complete after `page`.
///
/// A short page ends the listing. A listing that still falls short of
/// `total_count` when a page comes back empty or the page cap is hit is
/// truncated; aggregating it could hide a failure on a later page.
fn next_check_page(
    total_count: Option<u64>,
    received: usize,
    page_len: usize,
    page: u32,
) -> PageStep {
    let more_expected = match total_count {
        Some(total) => (received as u64) < total,
        None => page_len >= CHECK_RUNS_PAGE_SIZE,
    };
    if !more_expected {
        PageStep::Done
    } else if page_len == 0 || page >= MAX_CHECK_RUN_PAGES {
        PageStep::Truncated
    } else {
        PageStep::Next
    }
}

#[async_trait]
impl HostingClient for GitHubClient {
    fn repo(&self) -> &str {
        &self.config.repo
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        let wire: WirePull = self.get_json(&self.url(&format!("pulls/{}", number))).await?;
        Ok(wire.into())
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>> {
        let url = self.url(&format!("pulls?state=open&per_page={}", PAGE_SIZE));
        let wire: Vec<WirePull> = self.get_json(&url).await?;
        Ok(wire.into_iter().map(PullRequest::from).collect())
    }

    async fn list_open_issues(&self, label: Option<&str>) -> Result<Vec<Issue>> {
        let mut query = vec![("state", "open".to_string()), ("per_page", PAGE_SIZE.to_string())];
        if let Some(label) = label {
            query.push(("labels", label.to_string()));
        }
        let wire: Vec<WireIssue> = self.get_json_query(&self.url("issues"), &query).await?;
        Ok(wire
            .into_iter()
            .filter(|i| !i.is_pull_request())
            .map(Issue::from)
            .collect())
    }

    async fn list_checks(&self, sha: &str) -> ChecksOutcome {
        let runs = match self.fetch_check_runs(sha).await {
            Ok(runs) => runs,
            Err(e) => {
                emit_collaborator_unavailable("list_checks", &e);
                return ChecksOutcome::Unavailable(e.to_string());
            }
        };

        let mut checks: Vec<CheckResult> = Vec::with_capacity(runs.len());
        for run in runs {
            match run.into_check() {
                Ok(check) => checks.push(check),
                Err(e) => warn!(event = "checks.skipped", sha = %sha, error = %e),
            }
        }
        ChecksOutcome::Listed(checks)
    }

    async fn list_commit_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>> {
        let wire: WireCombinedStatus = self
            .get_json(&self.url(&format!("commits/{}/status", sha)))
            .await?;
        Ok(wire.statuses)
    }

    async fn list_comments(&self, number: u64) -> Result<Vec<Comment>> {
        let wire: Vec<WireComment> = self
            .get_json(&self.url(&format!("issues/{}/comments", number)))
            .await?;
        Ok(wire.into_iter().map(Comment::from).collect())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<CommentId> {
        let created: WireCreated = self
            .post_json(
                &self.url(&format!("issues/{}/comments", number)),
                json!({ "body": body }),
            )
            .await?;
        Ok(CommentId(created.id))
    }

    async fn ensure_label(&self, name: &str, color: &str) -> Result<bool> {
        let existing = self
            .send(Method::GET, &self.label_url(name)?, &[], None)
            .await;
        match existing {
            Ok(_) => return Ok(false),
            Err(HostingError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        self.send(
            Method::POST,
            &self.url("labels"),
            &[],
            Some(json!({
                "name": name,
                "color": color,
                "description": format!("Assigned to {} agent", name),
            })),
        )
        .await?;
        Ok(true)
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue> {
        let created: WireCreated = self
            .post_json(
                &self.url("issues"),
                json!({
                    "title": issue.title,
                    "body": issue.body,
                    "labels": issue.labels,
                }),
            )
            .await?;

        let number = created
            .number
            .ok_or_else(|| HostingError::Decode("created issue has no number".to_string()))?;
        Ok(CreatedIssue {
            number,
            html_url: created.html_url,
        })
    }
}
