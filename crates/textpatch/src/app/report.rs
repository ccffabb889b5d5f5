//! Console rendering of patch results.

use anyhow::{Context, Result};
use similar::TextDiff;

use crate::app::patch::PatchReport;
use crate::domain::model::PatchOutcome;

pub const SUCCESS_MESSAGE: &str = "Replacement completed successfully!";
pub const NO_MATCH_MESSAGE: &str = "No occurrences found; file left unchanged";
pub const UP_TO_DATE_MESSAGE: &str = "Already up to date; replacement matches existing text";

/// One human-readable line describing `outcome`.
///
/// A no-match never renders [`SUCCESS_MESSAGE`].
pub fn render_summary(outcome: &PatchOutcome) -> String {
    let path = outcome.path.display();
    let count = occurrences_label(outcome.occurrences);
    if !outcome.replaced() {
        return format!("{NO_MATCH_MESSAGE}: {path}");
    }
    if outcome.dry_run {
        return format!("Dry run: would replace {count} in {path}");
    }
    if !outcome.written {
        return format!("{UP_TO_DATE_MESSAGE} ({count} in {path})");
    }
    let mut line = format!("{SUCCESS_MESSAGE} ({count} in {path})");
    if let Some(backup) = &outcome.backup {
        line.push_str(&format!("; original saved to {}", backup.display()));
    }
    line
}

/// Unified diff between the text before and after substitution.
pub fn render_diff(report: &PatchReport) -> String {
    let path = report.outcome.path.display().to_string();
    TextDiff::from_lines(report.before.as_str(), report.after.as_str())
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{path}"), &format!("b/{path}"))
        .to_string()
}

/// Machine-readable single-line rendering of `outcome`.
pub fn render_json(outcome: &PatchOutcome) -> Result<String> {
    serde_json::to_string(outcome).context("failed to serialize patch outcome")
}

fn occurrences_label(count: usize) -> String {
    if count == 1 {
        "1 occurrence".into()
    } else {
        format!("{count} occurrences")
    }
}
