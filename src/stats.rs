//! Analyzer statistics block.
//!
//! `stats.txt` is produced by an external layout analyzer and copied into the
//! layout directory as-is. It looks roughly like:
//!
//! ```text
//! Colemak DH (english)
//! Sfb: 0.912%
//! Dsfb: 5.523%
//! [LP] 7.94%  [LR] 6.01%  [LM] 9.12%  [LI] 18.20%
//! ```
//!
//! It is embedded as escaped text with explicit `<br>` line breaks. Lines
//! opening with a bracketed label are indented, and the value after `Sfb:` is
//! padded so it lines up with the longer labels around it.

use crate::layout::{self, LayoutError};
use maud::html;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

const LABEL_INDENT: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

static SFB: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bSfb:[ \t]*").unwrap());

fn format_line(line: &str) -> String {
    let escaped = html! { (line.trim_end()) }.into_string();
    let padded = SFB.replace_all(&escaped, "Sfb:&nbsp;&nbsp;").into_owned();
    if line.trim_start().starts_with('[') {
        format!("{LABEL_INDENT}{}", padded.trim_start())
    } else {
        padded
    }
}

/// Reformat a statistics block for embedding in a page.
pub fn format_stats(raw: &str) -> String {
    raw.trim_end()
        .lines()
        .map(format_line)
        .collect::<Vec<_>>()
        .join("<br>\n")
}

/// Read and format a layout's statistics file. The file is mandatory.
pub fn read_stats(path: &Path) -> Result<String, LayoutError> {
    layout::read_required(path).map(|raw| format_stats(&raw))
}
