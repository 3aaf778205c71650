//! Shared types used across the batch: manifest entries, per-entry outcomes,
//! and the advisory diagnostics collected while rendering.

use crate::naming;
use std::path::PathBuf;

/// One line of the update manifest: a layout name and its language.
///
/// `language` is stored lowercase so it can be looked up in the frequency
/// store directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub language: String,
}

impl ManifestEntry {
    pub fn new(name: impl Into<String>, language: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            language: language.as_ref().to_lowercase(),
        }
    }

    /// Directory holding this layout's files, relative to the site root.
    pub fn dir_name(&self) -> String {
        naming::dir_name(&self.name)
    }

    /// Human-readable layout name used in headings and console output.
    pub fn display_name(&self) -> String {
        naming::display_name(&self.name)
    }

    /// Normalized `Name ~ Language` text written back to the manifest.
    pub fn to_line(&self) -> String {
        naming::manifest_line(&self.name, &self.language)
    }
}

/// Why an entry was excluded before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnknownLanguage(String),
    MissingDirectory(PathBuf),
    MissingFile(PathBuf),
}

/// Terminal state of a manifest entry after a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Page written; entry dropped from the manifest.
    Rendered { path: PathBuf },
    /// Rendering raised an error; entry is re-queued.
    Failed { reason: String },
    /// Entry never reached rendering; dropped without retry.
    Skipped(SkipReason),
}

/// Non-fatal, advisory findings. Each one is reported on its own line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A manifest line that doesn't look like `Name ~ Language`.
    MalformedLine { line_number: usize, text: String },
    /// A `[label](url)` whose url failed validation; left as plain text.
    MalformedLink { layout: String, snippet: String },
}
