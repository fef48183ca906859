//! Error taxonomy for agentgate domain logic.

/// Errors produced while reading collaborator input into domain types.
///
/// Every variant here is item-scoped: callers skip the offending entry,
/// emit a diagnostic and keep processing the remainder.
#[derive(Debug, thiserror::Error)]
pub enum MalformedInput {
    #[error("check result is missing a name")]
    UnnamedCheck,

    #[error("snapshot path is not valid UTF-8: {path}")]
    NonUtf8Path { path: String },

    #[error("snapshot path has no file stem: {path}")]
    MissingStem { path: String },

    #[error("snapshot {path} normalizes to an empty identifier")]
    EmptyCanonicalId { path: String },

    #[error("task #{index} is missing required field: {field}")]
    TaskField { index: usize, field: String },
}

/// agentgate domain errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("unknown platform scope: {0}")]
    UnknownPlatformScope(String),

    #[error("invalid task file: {0}")]
    InvalidTaskFile(String),

    #[error("malformed input: {0}")]
    Malformed(#[from] MalformedInput),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for agentgate domain operations.
pub type Result<T> = std::result::Result<T, CoreError>;
