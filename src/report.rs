//! Reindex status reporting.
//!
//! Every target document handled by a reindex run produces one
//! [`TargetOutcome`]. A reporter renders those as they happen: human lines
//! or JSON objects, always on **stderr** so stdout stays clean for command
//! output.

use std::io::Write;

use crate::markers::SpliceError;
use crate::reindex::{IndexOutcome, IndexTarget, SkipReason, TargetOutcome};

const PREFIX: &str = "[agent-protocol]";

/// Receives each target outcome as the reindex run produces it.
pub trait ReindexReporter: Send + Sync {
    fn report(&self, outcome: &TargetOutcome);
}

/// Human-friendly lines on stderr, one per target.
pub struct StderrReporter;

impl ReindexReporter for StderrReporter {
    fn report(&self, outcome: &TargetOutcome) {
        let line = format!("{} {}\n", PREFIX, describe(outcome));
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable reporting: one JSON object per line on stderr.
pub struct JsonReporter;

impl ReindexReporter for JsonReporter {
    fn report(&self, outcome: &TargetOutcome) {
        let obj = to_json(outcome);
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// Discards everything. Used by tests and by callers that only inspect the
/// returned report.
pub struct NoReport;

impl ReindexReporter for NoReport {
    fn report(&self, _outcome: &TargetOutcome) {}
}

/// Human lines for skipped targets only; updates stay silent.
pub struct SkipsOnlyReporter;

impl ReindexReporter for SkipsOnlyReporter {
    fn report(&self, outcome: &TargetOutcome) {
        if outcome.is_skipped() {
            StderrReporter.report(outcome);
        }
    }
}

/// Output mode for the CLI.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReportMode {
    Off,
    SkipsOnly,
    Human,
    Json,
}

impl ReportMode {
    pub fn reporter(&self) -> Box<dyn ReindexReporter> {
        match self {
            ReportMode::Off => Box::new(NoReport),
            ReportMode::SkipsOnly => Box::new(SkipsOnlyReporter),
            ReportMode::Human => Box::new(StderrReporter),
            ReportMode::Json => Box::new(JsonReporter),
        }
    }
}

fn target_label(target: &IndexTarget) -> String {
    match target {
        IndexTarget::ActiveWork => "Active Work Index".to_string(),
        IndexTarget::BuildFiles { item } => format!("Build File Index for {}", item),
    }
}

/// One-line human description of an outcome.
pub fn describe(outcome: &TargetOutcome) -> String {
    let path = outcome.path.display();
    let label = target_label(&outcome.target);
    match &outcome.outcome {
        IndexOutcome::Updated { rows } => {
            format!("Updated {} in {} ({} rows).", label, path, rows)
        }
        IndexOutcome::Unchanged { rows } => {
            format!("{} in {} is up to date ({} rows).", label, path, rows)
        }
        IndexOutcome::Skipped(SkipReason::TargetMissing) => match outcome.target {
            IndexTarget::ActiveWork => format!("{} not found. Run `agentproto init` first.", path),
            IndexTarget::BuildFiles { .. } => format!("{} not found.", path),
        },
        IndexOutcome::Skipped(SkipReason::BuildDocumentMissing) => {
            format!("Missing {}; skipping {}.", path, label)
        }
        IndexOutcome::Skipped(SkipReason::Markers(e)) => {
            format!("{} markers not found in {}: {}.", label, path, e)
        }
        IndexOutcome::Skipped(SkipReason::Io(e)) => {
            format!("Could not update {} in {}: {}", label, path, e)
        }
    }
}

fn to_json(outcome: &TargetOutcome) -> serde_json::Value {
    let (target, item) = match &outcome.target {
        IndexTarget::ActiveWork => ("active_work", None),
        IndexTarget::BuildFiles { item } => ("build_files", Some(item.as_str())),
    };
    let mut obj = serde_json::json!({
        "event": "reindex",
        "target": target,
        "item": item,
        "path": outcome.path.display().to_string(),
    });
    let fields = match &outcome.outcome {
        IndexOutcome::Updated { rows } => serde_json::json!({ "status": "updated", "rows": rows }),
        IndexOutcome::Unchanged { rows } => {
            serde_json::json!({ "status": "unchanged", "rows": rows })
        }
        IndexOutcome::Skipped(reason) => serde_json::json!({
            "status": "skipped",
            "reason": reason_code(reason),
            "message": describe(outcome),
        }),
    };
    if let (Some(obj), serde_json::Value::Object(fields)) = (obj.as_object_mut(), fields) {
        obj.extend(fields);
    }
    obj
}

fn reason_code(reason: &SkipReason) -> &'static str {
    match reason {
        SkipReason::TargetMissing => "target_missing",
        SkipReason::BuildDocumentMissing => "build_document_missing",
        SkipReason::Markers(SpliceError::MissingStart(_)) => "start_marker_missing",
        SkipReason::Markers(SpliceError::MissingEnd(_)) => "end_marker_missing",
        SkipReason::Markers(SpliceError::OutOfOrder) => "markers_out_of_order",
        SkipReason::Io(_) => "io",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn outcome(target: IndexTarget, outcome: IndexOutcome) -> TargetOutcome {
        TargetOutcome {
            target,
            path: PathBuf::from(".agentprotocol/README.md"),
            outcome,
        }
    }

    #[test]
    fn describes_missing_readme() {
        let o = outcome(
            IndexTarget::ActiveWork,
            IndexOutcome::Skipped(SkipReason::TargetMissing),
        );
        assert_eq!(
            describe(&o),
            ".agentprotocol/README.md not found. Run `agentproto init` first."
        );
    }

    #[test]
    fn json_carries_reason_code() {
        let o = outcome(
            IndexTarget::BuildFiles {
                item: "01-x".to_string(),
            },
            IndexOutcome::Skipped(SkipReason::Markers(SpliceError::OutOfOrder)),
        );
        let v = to_json(&o);
        assert_eq!(v["target"], "build_files");
        assert_eq!(v["item"], "01-x");
        assert_eq!(v["status"], "skipped");
        assert_eq!(v["reason"], "markers_out_of_order");
    }

    #[test]
    fn json_for_update_has_rows() {
        let o = outcome(IndexTarget::ActiveWork, IndexOutcome::Updated { rows: 3 });
        let v = to_json(&o);
        assert_eq!(v["status"], "updated");
        assert_eq!(v["rows"], 3);
        assert!(v["item"].is_null());
    }
}
