//! Parity report model, renderers and writer.

use std::fmt::Write as _;
use std::path::Path;

use agentgate_core::obs::emit_parity_matched;
use agentgate_core::{
    match_indices, MalformedInput, ParityClassification, ParityCounts, ParityRow, Platform,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::discover::index_dir;
use crate::error::{ParityError, Result};

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Html,
    Json,
}

/// Matcher output plus the context needed to present it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParityReport {
    pub generated_at: DateTime<Utc>,
    pub platform_a: Platform,
    pub platform_b: Platform,
    pub counts: ParityCounts,
    pub rows: Vec<ParityRow>,
}

/// Result of comparing two baseline directories.
#[derive(Debug)]
pub struct Comparison {
    pub report: ParityReport,
    /// Entries dropped during indexing, both sides.
    pub skipped: Vec<MalformedInput>,
    /// Directory entries neither walk could read.
    pub walk_errors: usize,
    /// Neither side had any usable baseline.
    pub both_empty: bool,
}

/// Discover, index and match two baseline directories.
///
/// Side A is always `Platform::Ios` and side B `Platform::Android`.
pub fn compare_dirs(ios_dir: &Path, android_dir: &Path, extension: &str) -> Comparison {
    let side_a = index_dir(ios_dir, Platform::Ios, extension);
    let side_b = index_dir(android_dir, Platform::Android, extension);

    let both_empty = side_a.index.is_empty() && side_b.index.is_empty();
    let matched = match_indices(&side_a.index, &side_b.index);
    let walk_errors = side_a.walk_errors + side_b.walk_errors;
    let mut skipped = side_a.skipped;
    skipped.extend(side_b.skipped);
    emit_parity_matched(&matched.counts);

    Comparison {
        report: ParityReport {
            generated_at: Utc::now(),
            platform_a: Platform::Ios,
            platform_b: Platform::Android,
            counts: matched.counts,
            rows: matched.rows,
        },
        skipped,
        walk_errors,
        both_empty,
    }
}

fn classification_class(classification: ParityClassification) -> &'static str {
    match classification {
        ParityClassification::Matched => "matched",
        ParityClassification::PlatformAOnly => "a-only",
        ParityClassification::PlatformBOnly => "b-only",
    }
}

/// Minimal HTML text/attribute escaping.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"body { font-family: -apple-system, system-ui, sans-serif; margin: 20px; background: #f5f5f5; }
h1 { color: #333; }
.stats { display: flex; gap: 20px; margin: 20px 0; }
.stat { padding: 15px 25px; border-radius: 8px; color: white; font-size: 18px; }
.stat-matched { background: #4CAF50; }
.stat-a-only { background: #007AFF; }
.stat-b-only { background: #3DDC84; }
.card-row { display: flex; gap: 20px; margin: 15px 0; padding: 15px; background: white; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
.card-name { font-weight: bold; min-width: 200px; padding-top: 10px; }
.snapshot { max-width: 400px; }
.snapshot img { max-width: 100%; border: 1px solid #ddd; border-radius: 4px; }
.label { font-size: 12px; color: #666; margin-bottom: 5px; }
.missing { color: #999; font-style: italic; padding: 20px; }
.status-matched { border-left: 4px solid #4CAF50; }
.status-a-only { border-left: 4px solid #007AFF; }
.status-b-only { border-left: 4px solid #3DDC84; }
"#;

fn snapshot_cell(out: &mut String, platform: Platform, row: &ParityRow, side_a: bool) {
    let entries = if side_a { &row.entries_a } else { &row.entries_b };
    let _ = writeln!(out, "  <div class=\"snapshot\">");
    let _ = writeln!(out, "    <div class=\"label\">{}</div>", platform);
    match entries.first() {
        Some(entry) => {
            let _ = writeln!(
                out,
                "    <img src=\"{}\" />",
                escape_html(&entry.raw_path.display().to_string())
            );
        }
        None => {
            let _ = writeln!(
                out,
                "    <span class=\"missing\">No {} snapshot</span>",
                platform
            );
        }
    }
    let _ = writeln!(out, "  </div>");
}

/// Side-by-side HTML report. Image paths are local filesystem references.
pub fn render_html(report: &ParityReport) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<title>Cross-Platform Parity Report</title>\n<meta charset=\"utf-8\">\n");
    out.push_str("<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str("<h1>Cross-Platform Snapshot Parity Report</h1>\n");
    let _ = writeln!(
        out,
        "<p class=\"generated\">Generated {}</p>",
        report.generated_at.to_rfc3339()
    );

    out.push_str("<div class=\"stats\">\n");
    let _ = writeln!(
        out,
        "  <div class=\"stat stat-matched\">Both Platforms: {}</div>",
        report.counts.matched
    );
    let _ = writeln!(
        out,
        "  <div class=\"stat stat-a-only\">{} Only: {}</div>",
        report.platform_a, report.counts.a_only
    );
    let _ = writeln!(
        out,
        "  <div class=\"stat stat-b-only\">{} Only: {}</div>",
        report.platform_b, report.counts.b_only
    );
    out.push_str("</div>\n");
    let _ = writeln!(out, "<p>Total cards: {}</p>", report.counts.total());

    for row in &report.rows {
        let _ = writeln!(
            out,
            "<div class=\"card-row status-{}\">",
            classification_class(row.classification)
        );
        let _ = writeln!(
            out,
            "  <div class=\"card-name\">{}</div>",
            escape_html(row.canonical_id.as_str())
        );
        snapshot_cell(&mut out, report.platform_a, row, true);
        snapshot_cell(&mut out, report.platform_b, row, false);
        out.push_str("</div>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Pretty JSON report.
pub fn render_json(report: &ParityReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render(report: &ParityReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Html => Ok(render_html(report)),
        ReportFormat::Json => render_json(report),
    }
}

/// Render and write the report, creating parent directories.
///
/// This is the one step of a parity run whose failure is fatal.
pub fn write_report(path: &Path, report: &ParityReport, format: ReportFormat) -> Result<()> {
    let content = render(report, format)?;
    let write_err = |source: std::io::Error| ParityError::WriteReport {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, content).map_err(write_err)?;

    info!(event = "parity.report_written", path = %path.display(), rows = report.rows.len());
    Ok(())
}
