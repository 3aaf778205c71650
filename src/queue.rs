//! Update manifest and the batch run that drains it.
//!
//! The manifest is a plain text file listing layouts whose pages need to be
//! regenerated, one `Name ~ Language` entry per line:
//!
//! ```text
//! Colemak DH ~ English
//! qwertz ~ german
//! ```
//!
//! ## Entry lifecycle
//!
//! ```text
//! Pending ──► Skipped    unknown language, or layout dir / layout / text file missing
//!         ──► Rendered   page written
//!         ──► Failed     rendering error (e.g. stats.txt not there yet)
//! ```
//!
//! Skipped and rendered entries leave the manifest. Failed entries are written
//! back in normalized form (`Colemak Dh ~ English`) so the next run retries
//! them. Lines that don't parse are reported once and dropped.
//!
//! The manifest file is only rewritten when its content changes, so a run over
//! an empty manifest touches nothing.

use crate::config::SiteConfig;
use crate::frequency::FrequencyStore;
use crate::generate::{self, PageFile};
use crate::layout::LayoutDir;
use crate::types::{Diagnostic, EntryOutcome, ManifestEntry, SkipReason};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Not a valid manifest entry: {0}")]
    InvalidEntry(String),
}

static ENTRY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*([\w'\-]+(?:[ \t]+[\w'\-]+)*)\s*~\s*([a-z]+)\s*$").unwrap()
});

/// Lines shorter than this (ignoring whitespace) are dropped without a report.
const MIN_REPORTED_LINE: usize = 3;

/// Parsed manifest: the valid entries plus one diagnostic per bad line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse one manifest line. `None` for anything that isn't `Name ~ Language`.
pub fn parse_line(line: &str) -> Option<ManifestEntry> {
    let caps = ENTRY_LINE.captures(line)?;
    Some(ManifestEntry::new(&caps[1], &caps[2]))
}

/// Parse manifest text.
pub fn parse_manifest(text: &str) -> Manifest {
    let mut manifest = Manifest::default();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(entry) => manifest.entries.push(entry),
            None => {
                let visible = line.chars().filter(|c| !c.is_whitespace()).count();
                if visible >= MIN_REPORTED_LINE {
                    manifest.diagnostics.push(Diagnostic::MalformedLine {
                        line_number: idx + 1,
                        text: line.trim().to_string(),
                    });
                }
            }
        }
    }
    manifest
}

/// Serialize entries back to manifest text, normalized.
pub fn serialize_manifest(entries: &[ManifestEntry]) -> String {
    entries.iter().map(|e| format!("{}\n", e.to_line())).collect()
}

/// Read the manifest file. A missing file reads as empty.
pub fn read_manifest(path: &Path) -> Result<String, QueueError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

/// Write `entries` to the manifest unless that would leave it unchanged.
///
/// Returns whether the file was written.
pub fn save_manifest(
    path: &Path,
    original: &str,
    entries: &[ManifestEntry],
) -> Result<bool, QueueError> {
    let text = serialize_manifest(entries);
    if text == original {
        return Ok(false);
    }
    fs::write(path, text)?;
    Ok(true)
}

/// Append an entry to the manifest. Returns `false` if it is already queued.
///
/// Entries whose line would not parse back are refused, since the next run
/// would drop them.
pub fn enqueue(path: &Path, entry: &ManifestEntry) -> Result<bool, QueueError> {
    let line = entry.to_line();
    if parse_line(&line).is_none() {
        return Err(QueueError::InvalidEntry(line));
    }
    let mut text = read_manifest(path)?;
    let manifest = parse_manifest(&text);
    if manifest.entries.iter().any(|e| e.to_line() == line) {
        return Ok(false);
    }
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&line);
    text.push('\n');
    fs::write(path, text)?;
    Ok(true)
}

/// Decide whether an entry can be rendered at all.
pub fn check_entry(
    root: &Path,
    entry: &ManifestEntry,
    store: &FrequencyStore,
    config: &SiteConfig,
) -> Result<(), SkipReason> {
    if !store.knows(&entry.language) {
        return Err(SkipReason::UnknownLanguage(entry.language.clone()));
    }
    let dir = LayoutDir::new(root.join(entry.dir_name()), &config.files);
    if !dir.dir.is_dir() {
        return Err(SkipReason::MissingDirectory(dir.dir));
    }
    if let Some(missing) = dir.first_missing() {
        return Err(SkipReason::MissingFile(missing.to_path_buf()));
    }
    Ok(())
}

/// What happened to one manifest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryReport {
    pub entry: ManifestEntry,
    pub outcome: EntryOutcome,
}

/// Result of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub entries: Vec<EntryReport>,
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the manifest file was rewritten.
    pub manifest_written: bool,
}

impl BatchReport {
    /// Entries that failed and went back into the manifest.
    pub fn requeued(&self) -> Vec<ManifestEntry> {
        self.entries
            .iter()
            .filter(|r| matches!(r.outcome, EntryOutcome::Failed { .. }))
            .map(|r| r.entry.clone())
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.diagnostics.is_empty()
    }
}

/// Render one entry, turning every error into an outcome.
fn process_entry(
    root: &Path,
    entry: &ManifestEntry,
    store: &FrequencyStore,
    config: &SiteConfig,
    page_file: PageFile,
    diagnostics: &mut Vec<Diagnostic>,
) -> EntryOutcome {
    if let Err(reason) = check_entry(root, entry, store, config) {
        return EntryOutcome::Skipped(reason);
    }
    let Some(table) = store.table(&entry.language) else {
        return EntryOutcome::Skipped(SkipReason::UnknownLanguage(entry.language.clone()));
    };
    match generate::generate_page(root, entry, table, config, page_file) {
        Ok(page) => {
            diagnostics.extend(page.malformed_links.into_iter().map(|snippet| {
                Diagnostic::MalformedLink {
                    layout: entry.display_name(),
                    snippet,
                }
            }));
            EntryOutcome::Rendered { path: page.path }
        }
        Err(e) => EntryOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

/// Drain the manifest: render every pending layout, then rewrite the manifest
/// with the entries that failed.
pub fn run_batch(
    root: &Path,
    config: &SiteConfig,
    store: &FrequencyStore,
    page_file: PageFile,
) -> Result<BatchReport, QueueError> {
    let manifest_path = config.manifest_path(root);
    let original = read_manifest(&manifest_path)?;
    let manifest = parse_manifest(&original);

    let mut report = BatchReport {
        diagnostics: manifest.diagnostics,
        ..Default::default()
    };

    for entry in manifest.entries {
        let outcome = process_entry(
            root,
            &entry,
            store,
            config,
            page_file,
            &mut report.diagnostics,
        );
        report.entries.push(EntryReport { entry, outcome });
    }

    report.manifest_written = save_manifest(&manifest_path, &original, &report.requeued())?;
    Ok(report)
}

/// Classify manifest entries without rendering or rewriting anything.
///
/// Entries that would be attempted come back as `None`; entries that would be
/// skipped carry their reason.
pub fn plan_batch(
    root: &Path,
    config: &SiteConfig,
    store: &FrequencyStore,
) -> Result<(Manifest, Vec<Option<SkipReason>>), QueueError> {
    let manifest = parse_manifest(&read_manifest(&config.manifest_path(root))?);
    let plan = manifest
        .entries
        .iter()
        .map(|entry| check_entry(root, entry, store, config).err())
        .collect();
    Ok((manifest, plan))
}
