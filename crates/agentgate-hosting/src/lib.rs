//! agentgate hosting layer
//!
//! Talks to the repository host (issues, pull requests, check runs,
//! comments) and runs the test-requirement enforcement sweep over agent
//! pull requests.
//!
//! ## Key Components
//!
//! - `HostingClient`: capability trait the sweep and CLI are written against
//! - `GitHubClient`: REST implementation configured by `HostingConfig`
//! - `EnforcementSweep`: fail-soft, sequential evaluation of target PRs
//! - `fakes::MemoryHostingClient`: in-memory implementation for tests

mod client;
mod config;
mod enforce;
mod error;
pub mod fakes;
mod github;
mod model;

pub use client::HostingClient;
pub use config::{HostingConfig, DEFAULT_API_URL, DEFAULT_REPO, DEFAULT_TIMEOUT_SECS};
pub use enforce::{
    apply_decision, CommentOutcome, EnforcementSweep, EnforcementTargets, PullRequestEnforcement,
    SkippedPullRequest, SweepReport,
};
pub use error::{HostingError, Result};
pub use github::GitHubClient;
pub use model::{Comment, CommentId, CommitStatus, CreatedIssue, Issue, NewIssue, PullRequest};
