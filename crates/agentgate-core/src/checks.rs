//! Check results reported against a commit.

use serde::{Deserialize, Serialize};

use crate::error::MalformedInput;

/// Terminal or in-progress state of a single check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Pending,
    Unknown,
}

impl Conclusion {
    /// Map a hosting-platform check run onto a [`Conclusion`].
    ///
    /// `conclusion` is the terminal result (absent while the run is still
    /// going) and `status` the lifecycle state. Terminal results other than
    /// success/failure (neutral, skipped, cancelled, timed_out, ...) map to
    /// `Unknown`.
    pub fn from_check_run(conclusion: Option<&str>, status: Option<&str>) -> Self {
        match conclusion {
            Some("success") => Conclusion::Success,
            Some("failure") => Conclusion::Failure,
            Some(_) => Conclusion::Unknown,
            None => match status {
                Some("queued") | Some("in_progress") | Some("pending") | Some("waiting")
                | Some("requested") | None => Conclusion::Pending,
                Some(_) => Conclusion::Unknown,
            },
        }
    }

    /// Map a legacy commit-status state (`success`, `failure`, `error`, `pending`).
    pub fn from_status_state(state: &str) -> Self {
        match state {
            "success" => Conclusion::Success,
            "failure" | "error" => Conclusion::Failure,
            "pending" => Conclusion::Pending,
            _ => Conclusion::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
            Conclusion::Pending => "pending",
            Conclusion::Unknown => "unknown",
        }
    }

    /// Single-glyph marker used in terminal listings.
    pub fn icon(&self) -> &'static str {
        match self {
            Conclusion::Success => "✓",
            Conclusion::Failure => "✗",
            Conclusion::Pending => "⏳",
            Conclusion::Unknown => "?",
        }
    }
}

impl std::fmt::Display for Conclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named check result. Immutable once read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CheckResult {
    pub name: String,
    pub conclusion: Conclusion,
}

impl CheckResult {
    pub fn new(name: impl Into<String>, conclusion: Conclusion) -> Self {
        Self {
            name: name.into(),
            conclusion,
        }
    }

    /// Build a check from possibly-incomplete collaborator fields.
    pub fn from_parts(
        name: Option<&str>,
        conclusion: Option<&str>,
        status: Option<&str>,
    ) -> Result<Self, MalformedInput> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(MalformedInput::UnnamedCheck)?;
        Ok(Self::new(name, Conclusion::from_check_run(conclusion, status)))
    }
}

/// What the check-results provider returned for one commit.
///
/// Keeps "the provider answered with nothing" apart from "the provider
/// could not be reached".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksOutcome {
    Listed(Vec<CheckResult>),
    Unavailable(String),
}

impl ChecksOutcome {
    /// Checks when listed, `None` when unavailable.
    pub fn checks(&self) -> Option<&[CheckResult]> {
        match self {
            ChecksOutcome::Listed(checks) => Some(checks),
            ChecksOutcome::Unavailable(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_conclusions() {
        assert_eq!(
            Conclusion::from_check_run(Some("success"), Some("completed")),
            Conclusion::Success
        );
        assert_eq!(
            Conclusion::from_check_run(Some("failure"), Some("completed")),
            Conclusion::Failure
        );
        assert_eq!(
            Conclusion::from_check_run(Some("neutral"), Some("completed")),
            Conclusion::Unknown
        );
        assert_eq!(
            Conclusion::from_check_run(Some("cancelled"), Some("completed")),
            Conclusion::Unknown
        );
    }

    #[test]
    fn test_in_progress_is_pending() {
        assert_eq!(
            Conclusion::from_check_run(None, Some("in_progress")),
            Conclusion::Pending
        );
        assert_eq!(
            Conclusion::from_check_run(None, Some("queued")),
            Conclusion::Pending
        );
        assert_eq!(Conclusion::from_check_run(None, None), Conclusion::Pending);
        assert_eq!(
            Conclusion::from_check_run(None, Some("completed")),
            Conclusion::Unknown
        );
    }

    #[test]
    fn test_status_states() {
        assert_eq!(Conclusion::from_status_state("error"), Conclusion::Failure);
        assert_eq!(Conclusion::from_status_state("pending"), Conclusion::Pending);
        assert_eq!(Conclusion::from_status_state("weird"), Conclusion::Unknown);
    }

    #[test]
    fn test_unnamed_check_rejected() {
        assert!(CheckResult::from_parts(None, Some("success"), None).is_err());
        assert!(CheckResult::from_parts(Some("  "), Some("success"), None).is_err());

        let check = CheckResult::from_parts(Some("build"), Some("failure"), None).unwrap();
        assert_eq!(check.name, "build");
        assert_eq!(check.conclusion, Conclusion::Failure);
    }

    #[test]
    fn test_outcome_checks_accessor() {
        let listed = ChecksOutcome::Listed(vec![CheckResult::new("a", Conclusion::Success)]);
        assert_eq!(listed.checks().map(|c| c.len()), Some(1));

        let unavailable = ChecksOutcome::Unavailable("timeout".to_string());
        assert!(unavailable.checks().is_none());
    }

    #[test]
    fn test_conclusion_serde_snake_case() {
        let json = serde_json::to_string(&Conclusion::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }
}
