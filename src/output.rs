//! CLI output formatting for batch runs.
//!
//! Every manifest entry gets exactly one line saying what happened to it, and
//! every advisory finding (bad manifest line, bad link) gets one line of its
//! own. Paths are shown relative to the site root.
//!
//! # Output Format
//!
//! ```text
//! Rendered Colemak Dh (English) → colemak_dh/template.html
//! Failed Querty (English): required file not found: querty/stats.txt (requeued)
//! Skipped Workman (English): no layout directory workman/
//! Malformed link in Colemak Dh: [Site](not a url)
//! Manifest line 4 is not `Name ~ Language`: not an entry
//!
//! 1 rendered, 1 requeued, 1 skipped
//! ```
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` and do no I/O; `print_*`
//! wrappers write them to stdout.

use crate::naming;
use crate::queue::{BatchReport, EntryReport, Manifest};
use crate::types::{Diagnostic, EntryOutcome, ManifestEntry, SkipReason};
use std::path::Path;

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// `Colemak Dh (English)`
fn entry_label(entry: &ManifestEntry) -> String {
    format!(
        "{} ({})",
        entry.display_name(),
        naming::title_case(&entry.language)
    )
}

fn format_skip_reason(reason: &SkipReason, root: &Path) -> String {
    match reason {
        SkipReason::UnknownLanguage(language) => format!("unknown language '{language}'"),
        SkipReason::MissingDirectory(dir) => {
            format!("no layout directory {}/", relative(dir, root))
        }
        SkipReason::MissingFile(file) => format!("missing {}", relative(file, root)),
    }
}

/// One line describing what happened to an entry.
pub fn format_entry(report: &EntryReport, root: &Path) -> String {
    let label = entry_label(&report.entry);
    match &report.outcome {
        EntryOutcome::Rendered { path } => {
            format!("Rendered {label} → {}", relative(path, root))
        }
        EntryOutcome::Failed { reason } => {
            let root_prefix = format!("{}/", root.display());
            format!("Failed {label}: {} (requeued)", reason.replace(&root_prefix, ""))
        }
        EntryOutcome::Skipped(reason) => {
            format!("Skipped {label}: {}", format_skip_reason(reason, root))
        }
    }
}

pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    match diagnostic {
        Diagnostic::MalformedLine { line_number, text } => {
            format!("Manifest line {line_number} is not `Name ~ Language`: {text}")
        }
        Diagnostic::MalformedLink { layout, snippet } => {
            format!("Malformed link in {layout}: {snippet}")
        }
    }
}

/// Format a finished batch run. An empty run produces no lines.
pub fn format_batch_report(report: &BatchReport, root: &Path) -> Vec<String> {
    let mut lines: Vec<String> = report
        .entries
        .iter()
        .map(|r| format_entry(r, root))
        .collect();
    lines.extend(report.diagnostics.iter().map(format_diagnostic));

    if !report.entries.is_empty() {
        let rendered = report.count(|o| matches!(o, EntryOutcome::Rendered { .. }));
        let failed = report.count(|o| matches!(o, EntryOutcome::Failed { .. }));
        let skipped = report.count(|o| matches!(o, EntryOutcome::Skipped(_)));
        lines.push(String::new());
        lines.push(format!(
            "{rendered} rendered, {failed} requeued, {skipped} skipped"
        ));
    }
    lines
}

/// Format the `check` command's view of the manifest.
pub fn format_plan(manifest: &Manifest, plan: &[Option<SkipReason>], root: &Path) -> Vec<String> {
    let mut lines: Vec<String> = manifest
        .entries
        .iter()
        .zip(plan)
        .map(|(entry, skip)| match skip {
            None => format!("Pending {}", entry_label(entry)),
            Some(reason) => format!(
                "Would skip {}: {}",
                entry_label(entry),
                format_skip_reason(reason, root)
            ),
        })
        .collect();
    lines.extend(manifest.diagnostics.iter().map(format_diagnostic));
    lines
}

pub fn print_batch_report(report: &BatchReport, root: &Path) {
    for line in format_batch_report(report, root) {
        println!("{}", line);
    }
}

pub fn print_plan(manifest: &Manifest, plan: &[Option<SkipReason>], root: &Path) {
    for line in format_plan(manifest, plan, root) {
        println!("{}", line);
    }
}
