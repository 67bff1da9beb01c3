use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use lexcrawl_core::{BatchReport, CrawlOutcome, OutcomeStatus};
use lexcrawl_engine::AtomicFileWriter;
use serde_json::{json, Value};

/// One line per item, then the totals.
pub fn summary_lines(report: &BatchReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .enumerate()
        .map(|(index, outcome)| format!("[{}] {}", index + 1, outcome_line(outcome)))
        .collect();
    lines.push(report.to_string());
    lines
}

fn outcome_line(outcome: &CrawlOutcome) -> String {
    match &outcome.status {
        OutcomeStatus::Success { path } => format!("ok      {} -> {}", outcome.url, path.display()),
        OutcomeStatus::Failure { stage, reason } => {
            format!("failed  {} ({stage}: {reason})", outcome.url)
        }
        OutcomeStatus::Skipped => format!("skipped {}", outcome.url),
    }
}

pub fn report_json(report: &BatchReport, generated_at: DateTime<Utc>) -> Value {
    let outcomes: Vec<Value> = report.outcomes.iter().map(outcome_json).collect();
    json!({
        "generated_at": generated_at.to_rfc3339(),
        "total": report.total,
        "succeeded": report.succeeded,
        "failed": report.failed,
        "skipped": report.skipped,
        "outcomes": outcomes,
    })
}

fn outcome_json(outcome: &CrawlOutcome) -> Value {
    match &outcome.status {
        OutcomeStatus::Success { path } => json!({
            "url": outcome.url,
            "status": "success",
            "path": path.display().to_string(),
        }),
        OutcomeStatus::Failure { stage, reason } => json!({
            "url": outcome.url,
            "status": "failure",
            "stage": stage.as_str(),
            "reason": reason,
        }),
        OutcomeStatus::Skipped => json!({
            "url": outcome.url,
            "status": "skipped",
        }),
    }
}

/// Atomically replaces `path` with the JSON report.
pub fn write_json_report(
    report: &BatchReport,
    path: &Path,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let content = serde_json::to_string_pretty(&report_json(report, generated_at))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("report path {} has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    AtomicFileWriter::new(dir)
        .write(filename, &content)
        .with_context(|| format!("cannot write report {}", path.display()))
}
