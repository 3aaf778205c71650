//! Layout description text → HTML sections.
//!
//! Descriptions are written in a small markdown-like dialect:
//!
//! ```text
//! # Heading            starts a new section (any number of #)
//! blank line           separates paragraphs
//! **bold**  *italic*  __underline__  _italic_  ~~strike~~  `code`
//! [label](example.com/path)
//! \*  \_  \~  \`       literal marker characters
//! ```
//!
//! ## Pipeline
//!
//! 1. HTML-escape the raw text.
//! 2. Hide backslash-escaped markers and the url part of every
//!    `[label](url)` behind placeholder characters.
//! 3. Apply the emphasis rules one after another, in [`EMPHASIS`] order. Each
//!    rule only matches a single token: the span may not contain whitespace or
//!    its own marker character.
//! 4. Put the urls back, then the escaped markers as plain characters.
//! 5. Turn `[label](url)` into anchors when the url is well formed; leave it
//!    untouched and record it otherwise. A `#` inside an anchor is held back
//!    as a placeholder so it cannot start a section.
//! 6. Split on runs of `#` into sections and split section bodies on blank
//!    lines into paragraphs. Sections without body text are dropped.
//!
//! The ordering is significant: `***word***` becomes `<i><b>word</b></i>`
//! because bold runs before italic.

use crate::layout::{self, LayoutError};
use maud::{Markup, PreEscaped, html};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::Path;

/// An inline emphasis rule: `marker text marker` → `<tag>text</tag>`.
#[derive(Debug, Clone, Copy)]
pub struct Emphasis {
    pub marker: &'static str,
    pub tag: &'static str,
}

/// Emphasis rules in the order they are applied.
pub const EMPHASIS: [Emphasis; 6] = [
    Emphasis { marker: "**", tag: "b" },
    Emphasis { marker: "*", tag: "i" },
    Emphasis { marker: "__", tag: "u" },
    Emphasis { marker: "_", tag: "i" },
    Emphasis { marker: "~~", tag: "s" },
    Emphasis { marker: "`", tag: "code" },
];

/// Characters that can be written literally with a leading backslash.
const ESCAPABLE: [char; 4] = ['*', '_', '~', '`'];

/// Private-use code points standing in for escaped markers.
const PLACEHOLDER_BASE: u32 = 0xE000;

/// Private-use code points standing in for link urls, one per link.
const URL_PLACEHOLDER_BASE: u32 = 0xE100;

/// Stands in for `#` inside generated anchors until sections are split.
const ANCHOR_HASH: char = '\u{E0FF}';

static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]\(([^()]*)\)").unwrap());

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*://)?(?:www\d*\.)?[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}(?:/[^\s/<>"]+)*/?$"#,
    )
    .unwrap()
});

static HEADER_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"#+").unwrap());

static PARAGRAPH_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// One section of converted text: an optional heading plus its paragraphs.
///
/// Titles and paragraphs are already HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: Option<String>,
    pub paragraphs: Vec<String>,
}

impl Section {
    pub fn render(&self) -> Markup {
        html! {
            @if let Some(title) = &self.title {
                h2 { (PreEscaped(title)) }
            }
            section {
                @for paragraph in &self.paragraphs {
                    p { (PreEscaped(paragraph)) }
                }
            }
        }
    }
}

/// Result of converting one description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Converted {
    pub sections: Vec<Section>,
    /// `[label](url)` snippets whose url failed validation, as written.
    pub malformed_links: Vec<String>,
}

impl Converted {
    /// All sections as one HTML fragment, in source order.
    pub fn to_html(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.render().into_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn escape_html(text: &str) -> String {
    html! { (text) }.into_string()
}

fn placeholder(idx: usize) -> char {
    char::from_u32(PLACEHOLDER_BASE + idx as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Replace `\*`, `\_`, `\~` and `` \` `` with placeholders.
fn hide_escaped_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(idx) = chars.peek().and_then(|n| ESCAPABLE.iter().position(|e| e == n)) {
                chars.next();
                out.push(placeholder(idx));
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn restore_escaped_markers(text: &str) -> String {
    text.chars()
        .map(|c| {
            (c as u32)
                .checked_sub(PLACEHOLDER_BASE)
                .and_then(|idx| ESCAPABLE.get(idx as usize).copied())
                .unwrap_or(c)
        })
        .collect()
}

fn url_placeholder(idx: usize) -> char {
    char::from_u32(URL_PLACEHOLDER_BASE + idx as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Swap the url of every `[label](url)` for a placeholder so emphasis only
/// touches labels. Returns the urls in placeholder order.
fn hide_link_targets(text: &str) -> (String, Vec<String>) {
    let mut urls = Vec::new();
    let hidden = LINK.replace_all(text, |caps: &Captures| {
        let marker = url_placeholder(urls.len());
        urls.push(caps[2].to_string());
        format!("[{}]({marker})", &caps[1])
    });
    (hidden.into_owned(), urls)
}

fn restore_link_targets(text: &str, urls: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let url = (c as u32)
            .checked_sub(URL_PLACEHOLDER_BASE)
            .and_then(|idx| urls.get(idx as usize));
        match url {
            Some(url) => out.push_str(url),
            None => out.push(c),
        }
    }
    out
}

/// Apply one emphasis rule across the whole text, leftmost match first.
pub fn apply_emphasis(text: &str, rule: &Emphasis) -> String {
    let marker = rule.marker;
    let marker_char = marker.chars().next().unwrap_or('*');
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(marker) {
        let inner_start = start + marker.len();
        let tail = &rest[inner_start..];
        let inner_len = tail
            .find(|c: char| c == marker_char || c.is_whitespace())
            .unwrap_or(tail.len());
        let (inner, after) = tail.split_at(inner_len);

        if !inner.is_empty() && after.starts_with(marker) {
            out.push_str(&rest[..start]);
            out.push_str(&format!("<{tag}>{inner}</{tag}>", tag = rule.tag));
            rest = &after[marker.len()..];
        } else {
            let next = start + marker_char.len_utf8();
            out.push_str(&rest[..next]);
            rest = &rest[next..];
        }
    }
    out.push_str(rest);
    out
}

/// Run every emphasis rule in precedence order.
pub fn apply_all_emphasis(text: &str) -> String {
    EMPHASIS
        .iter()
        .fold(text.to_string(), |acc, rule| apply_emphasis(&acc, rule))
}

/// Replace well-formed `[label](url)` links with anchors.
///
/// Urls without a scheme get `https://`. Malformed links are left as they are
/// and returned alongside the text. Every `#` inside an anchor comes out as
/// [`ANCHOR_HASH`].
fn link_urls(text: &str) -> (String, Vec<String>) {
    let mut malformed = Vec::new();
    let linked = LINK.replace_all(text, |caps: &Captures| {
        let label = &caps[1];
        let url = caps[2].trim();
        match URL.captures(url) {
            Some(url_caps) => {
                let href = if url_caps.name("scheme").is_some() {
                    url.to_string()
                } else {
                    format!("https://{url}")
                };
                format!(r#"<a href="{href}">{label}</a>"#).replace('#', &ANCHOR_HASH.to_string())
            }
            None => {
                malformed.push(caps[0].to_string());
                caps[0].to_string()
            }
        }
    });
    (linked.into_owned(), malformed)
}

fn paragraphs(body: &str) -> Vec<String> {
    PARAGRAPH_SPLIT
        .split(body)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.replace('\n', "<br>\n"))
        .collect()
}

/// Split linked, emphasized text into sections.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    for (idx, piece) in HEADER_SPLIT.split(text).enumerate() {
        if piece.is_empty() {
            continue;
        }
        // The piece before the first `#` has no heading.
        let (title, body) = if idx == 0 {
            (None, piece)
        } else {
            let (first_line, body) = piece.split_once('\n').unwrap_or((piece, ""));
            let title = first_line.trim().trim_matches('#').trim().to_string();
            (Some(title).filter(|t| !t.is_empty()), body)
        };
        let paragraphs = paragraphs(body);
        if paragraphs.is_empty() {
            continue;
        }
        sections.push(Section { title, paragraphs });
    }
    sections
}

/// Convert description text to HTML sections.
pub fn convert(text: &str) -> Converted {
    let normalized = text.replace("\r\n", "\n");
    let escaped = escape_html(&normalized);
    let (hidden, urls) = hide_link_targets(&hide_escaped_markers(&escaped));
    let emphasized = apply_all_emphasis(&hidden);
    let restored = restore_escaped_markers(&restore_link_targets(&emphasized, &urls));
    let (linked, malformed_links) = link_urls(&restored);

    let unhash = |s: &str| s.replace(ANCHOR_HASH, "#");
    let sections = split_sections(&linked)
        .into_iter()
        .map(|section| Section {
            title: section.title.as_deref().map(unhash),
            paragraphs: section.paragraphs.iter().map(|p| unhash(p.as_str())).collect(),
        })
        .collect();
    Converted {
        sections,
        malformed_links,
    }
}

/// Convert a description file. A missing file converts to no sections.
pub fn convert_file(path: &Path) -> Result<Converted, LayoutError> {
    let text = layout::read_optional(path)?;
    Ok(convert(&text))
}
