//! Hosting collaborator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HostingError, Result};

/// Repository the tooling manages when none is given.
pub const DEFAULT_REPO: &str = "VikrantSingh01/AdaptiveCards-Mobile";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Hosting API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostingConfig {
    /// `owner/name` slug of the target repository
    pub repo: String,
    /// REST API base URL
    pub api_url: String,
    /// Bearer token (optional for read-only access to public repos)
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HostingConfig {
    fn default() -> Self {
        HostingConfig {
            repo: std::env::var("AGENTGATE_REPO").unwrap_or_else(|_| DEFAULT_REPO.to_string()),
            api_url: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token: std::env::var("GITHUB_TOKEN")
                .ok()
                .or_else(|| std::env::var("GH_TOKEN").ok())
                .filter(|t| !t.is_empty()),
            timeout_secs: std::env::var("AGENTGATE_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl HostingConfig {
    /// Create a config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific repository
    pub fn new(repo: &str) -> Self {
        HostingConfig {
            repo: repo.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Override the repository
    pub fn with_repo(mut self, repo: &str) -> Self {
        self.repo = repo.to_string();
        self
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Override the API base URL
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject slugs that are not `owner/name`.
    pub fn validate(&self) -> Result<()> {
        let mut parts = self.repo.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(()),
            _ => Err(HostingError::NotConfigured(format!(
                "repository must be `owner/name`, got `{}`",
                self.repo
            ))),
        }
    }
}
