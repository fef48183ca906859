//! agentgate parity
//!
//! Finds recorded visual-regression baselines for iOS and Android, matches
//! them by canonical test-case identifier and renders the result as an HTML
//! or JSON report.

mod discover;
mod error;
mod report;

pub use discover::{discover, index_dir, Discovery, IndexedDir, DEFAULT_EXTENSION};
pub use error::{ParityError, Result};
pub use report::{
    compare_dirs, escape_html, render, render_html, render_json, write_report, Comparison,
    ParityReport, ReportFormat,
};

/// Printed when neither platform has any baseline yet.
pub const RECORDING_HINTS: &str = "\
No snapshots found on either platform.
Record baselines first:
  iOS:     cd ios && RECORD_SNAPSHOTS=1 swift test --filter VisualTests
  Android: cd android && ./gradlew :ac-rendering:recordPaparazziDebug";
