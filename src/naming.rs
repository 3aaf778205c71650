//! Centralized name handling for layouts and languages.
//!
//! A layout is known by three spellings of the same name:
//!
//! - **Manifest name**: whatever the user typed in the queue (`colemak-dh`)
//! - **Directory name**: lowercase, separators → underscores (`colemak_dh`)
//! - **Display name**: title case, separators → spaces (`Colemak Dh`)
//!
//! Languages are stored lowercase (`english`) and displayed title-cased
//! (`English`).

/// Directory name for a layout: lowercase, runs of whitespace, `-` and `_`
/// → one `_`.
///
/// Agrees with [`display_name`], so an entry written back to the manifest
/// resolves to the same directory.
///
/// - `"Colemak DH"` → `"colemak_dh"`
/// - `"  qwerty "` → `"qwerty"`
/// - `"semimak-jq"` → `"semimak_jq"`
pub fn dir_name(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Display name: `_` and `-` become spaces, then each word is title-cased.
///
/// - `"colemak_dh"` → `"Colemak Dh"`
/// - `"QWERTY"` → `"Qwerty"`
/// - `"semimak-jq"` → `"Semimak Jq"`
pub fn display_name(name: &str) -> String {
    title_case(&name.replace(['_', '-'], " "))
}

/// Title-case every whitespace-separated word and collapse the separators.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The textual form a manifest entry is written back in: `Name ~ Language`.
pub fn manifest_line(name: &str, language: &str) -> String {
    format!("{} ~ {}", display_name(name), title_case(language))
}
