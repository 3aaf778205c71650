//! Character frequency tables.
//!
//! The store is a single JSON file mapping each language to the prevalence
//! of every character in that language's corpus:
//!
//! ```json
//! {
//!   "english": { "e": 0.1202, "t": 0.0910, "a": 0.0812 },
//!   "german":  { "e": 0.1740, "n": 0.0978 }
//! }
//! ```
//!
//! It is loaded once per batch and handed to the keyboard renderer by
//! reference; nothing mutates it afterwards.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrequencyError {
    #[error("frequency store not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed frequency store: {0}")]
    Malformed(String),
}

/// Prevalence of each character in one language, in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyTable {
    prevalence: HashMap<char, f64>,
}

impl FrequencyTable {
    /// Prevalence of `c`; untracked characters count as never used.
    pub fn prevalence(&self, c: char) -> f64 {
        self.prevalence.get(&c).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.prevalence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prevalence.is_empty()
    }
}

impl FromIterator<(char, f64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (char, f64)>>(iter: I) -> Self {
        Self {
            prevalence: iter.into_iter().collect(),
        }
    }
}

/// All frequency tables, keyed by lowercase language name.
#[derive(Debug, Clone, Default)]
pub struct FrequencyStore {
    tables: BTreeMap<String, FrequencyTable>,
}

impl FrequencyStore {
    pub fn table(&self, language: &str) -> Option<&FrequencyTable> {
        self.tables.get(&language.to_lowercase())
    }

    pub fn knows(&self, language: &str) -> bool {
        self.table(language).is_some()
    }

    /// Known languages in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn insert(&mut self, language: &str, table: FrequencyTable) {
        self.tables.insert(language.to_lowercase(), table);
    }
}

#[derive(Deserialize)]
#[serde(transparent)]
struct RawStore(BTreeMap<String, BTreeMap<String, f64>>);

/// Parse a store from its JSON text.
pub fn parse_store(json: &str) -> Result<FrequencyStore, FrequencyError> {
    let RawStore(raw) = serde_json::from_str(json)?;
    let mut store = FrequencyStore::default();
    for (language, entries) in raw {
        let mut table = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            let mut chars = key.chars();
            let c = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(FrequencyError::Malformed(format!(
                        "{language}: key {key:?} is not a single character"
                    )));
                }
            };
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(FrequencyError::Malformed(format!(
                    "{language}: prevalence of {key:?} is {value}, expected 0..=1"
                )));
            }
            table.insert(c, value);
        }
        store.insert(&language, FrequencyTable { prevalence: table });
    }
    Ok(store)
}

/// Load the frequency store from disk.
pub fn load_store(path: &Path) -> Result<FrequencyStore, FrequencyError> {
    if !path.is_file() {
        return Err(FrequencyError::Missing(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    parse_store(&content)
}
