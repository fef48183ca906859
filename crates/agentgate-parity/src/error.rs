//! Error types for parity reporting

use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a parity run.
///
/// Discovery problems never show up here; they degrade to warnings and an
/// empty or partial index.
#[derive(Error, Debug)]
pub enum ParityError {
    /// The rendered report could not be written to its destination.
    #[error("failed to write report to {path}: {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ParityError>;
