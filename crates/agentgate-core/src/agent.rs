//! Coding agents and the platform scopes issues are filed against.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// How the hosting platform recognises one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentProfile {
    /// Account or app slug used for assignment.
    pub assignee: &'static str,
    /// Mention that triggers the agent in issue/PR comments.
    pub mention: &'static str,
    /// Label used to tag the agent's issues.
    pub label: &'static str,
    pub description: &'static str,
}

/// Supported coding agents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Copilot,
    Claude,
}

impl AgentKind {
    pub const ALL: [AgentKind; 2] = [AgentKind::Copilot, AgentKind::Claude];

    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::Copilot => "copilot",
            AgentKind::Claude => "claude",
        }
    }

    pub fn profile(&self) -> AgentProfile {
        match self {
            AgentKind::Copilot => AgentProfile {
                assignee: "copilot-swe-agent",
                mention: "@copilot",
                label: "copilot",
                description: "GitHub Copilot SWE Agent",
            },
            AgentKind::Claude => AgentProfile {
                assignee: "claude",
                mention: "@claude",
                label: "claude",
                description: "Claude Code Agent",
            },
        }
    }

    /// Account logins that author pull requests on behalf of this agent.
    pub fn author_logins(&self) -> &'static [&'static str] {
        match self {
            AgentKind::Copilot => &["copilot-swe-agent", "copilot[bot]", "github-copilot[bot]"],
            AgentKind::Claude => &["claude"],
        }
    }

    /// Agent that authored a pull request, if any.
    pub fn from_author(login: &str) -> Option<AgentKind> {
        Self::ALL
            .into_iter()
            .find(|agent| agent.author_logins().contains(&login))
    }

    /// Terminal marker shown next to agent-authored pull requests.
    pub fn marker(&self) -> &'static str {
        match self {
            AgentKind::Copilot => "🤖",
            AgentKind::Claude => "🧠",
        }
    }
}

impl std::str::FromStr for AgentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "copilot" => Ok(AgentKind::Copilot),
            "claude" => Ok(AgentKind::Claude),
            other => Err(CoreError::UnknownAgent(other.to_string())),
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `login` belongs to any known agent.
pub fn is_agent_author(login: &str) -> bool {
    AgentKind::from_author(login).is_some()
}

/// Platform an issue is scoped to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlatformScope {
    Ios,
    Android,
    Shared,
    Ci,
}

impl PlatformScope {
    /// Label applied to issues in this scope.
    pub fn label(&self) -> &'static str {
        match self {
            PlatformScope::Ios => "ios",
            PlatformScope::Android => "android",
            PlatformScope::Shared => "shared",
            PlatformScope::Ci => "ci",
        }
    }
}

impl std::str::FromStr for PlatformScope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(PlatformScope::Ios),
            "android" => Ok(PlatformScope::Android),
            "shared" => Ok(PlatformScope::Shared),
            "ci" => Ok(PlatformScope::Ci),
            other => Err(CoreError::UnknownPlatformScope(other.to_string())),
        }
    }
}

impl std::fmt::Display for PlatformScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_profiles() {
        assert_eq!(AgentKind::Copilot.profile().mention, "@copilot");
        assert_eq!(AgentKind::Claude.profile().label, "claude");
        assert_eq!(AgentKind::Copilot.profile().assignee, "copilot-swe-agent");
    }

    #[test]
    fn test_agent_from_author() {
        assert_eq!(AgentKind::from_author("copilot[bot]"), Some(AgentKind::Copilot));
        assert_eq!(AgentKind::from_author("claude"), Some(AgentKind::Claude));
        assert_eq!(AgentKind::from_author("octocat"), None);
        assert!(is_agent_author("github-copilot[bot]"));
        assert!(!is_agent_author("hggz"));
    }

    #[test]
    fn test_agent_parse() {
        assert_eq!("Copilot".parse::<AgentKind>().unwrap(), AgentKind::Copilot);
        let err = "gemini".parse::<AgentKind>().unwrap_err();
        assert!(err.to_string().contains("gemini"));
    }

    #[test]
    fn test_platform_scope_parse_and_label() {
        let scope: PlatformScope = "iOS".parse().unwrap();
        assert_eq!(scope, PlatformScope::Ios);
        assert_eq!(scope.label(), "ios");
        assert!("web".parse::<PlatformScope>().is_err());
    }
}
