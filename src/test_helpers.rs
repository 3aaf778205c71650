//! Shared test utilities for the layout-pages test suite.
//!
//! Builds a small throwaway site in a temp directory:
//!
//! ```text
//! <tmp>/
//! ├── frequencies.json     # english + german tables
//! └── colemak_dh/
//!     ├── layout.txt
//!     ├── info.txt
//!     └── stats.txt
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let site = setup_site();
//! site.write_manifest("Colemak DH ~ English\n");
//! let report = run_batch(site.root(), &site.config, &site.store, PageFile::Template).unwrap();
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::{self, SiteConfig};
use crate::frequency::{self, FrequencyStore, FrequencyTable};

pub const FREQUENCIES_JSON: &str = r#"{
  "english": { "e": 0.12, "t": 0.09, "a": 0.08, "o": 0.075, "q": 0.001 },
  "german":  { "e": 0.17, "n": 0.098, "ä": 0.005 }
}"#;

pub const COLEMAK_DH_KEYS: &str = "q w f p b  j l u y ;\na r s t g  m n e i o\nz x c d v  k h , . /\n";

pub const COLEMAK_DH_TEXT: &str = "# Overview\nHello **world**.\n\n## History\nA mod of [Colemak](colemak.com).\n";

pub const COLEMAK_DH_STATS: &str = "Colemak DH (english)\nSfb: 0.912%\nDsfb: 5.523%\n[LP] 7.94%  [LR] 6.01%\n";

/// A temporary site with loaded config and frequency store.
pub struct TestSite {
    pub tmp: TempDir,
    pub config: SiteConfig,
    pub store: FrequencyStore,
}

impl TestSite {
    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Frequency table for a language. Panics if the store lacks it.
    pub fn table(&self, language: &str) -> &FrequencyTable {
        self.store
            .table(language)
            .unwrap_or_else(|| panic!("no frequency table for '{language}'"))
    }

    pub fn write_manifest(&self, content: &str) {
        fs::write(self.config.manifest_path(self.root()), content).unwrap();
    }

    pub fn read_manifest(&self) -> String {
        fs::read_to_string(self.config.manifest_path(self.root())).unwrap()
    }
}

/// Create a layout directory. `stats: None` leaves `stats.txt` out.
pub fn add_layout(root: &Path, dir_name: &str, keys: &str, text: &str, stats: Option<&str>) {
    let dir = root.join(dir_name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("layout.txt"), keys).unwrap();
    fs::write(dir.join("info.txt"), text).unwrap();
    if let Some(stats) = stats {
        fs::write(dir.join("stats.txt"), stats).unwrap();
    }
}

/// Build the standard test site: a frequency store and one complete layout.
pub fn setup_site() -> TestSite {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("frequencies.json"), FREQUENCIES_JSON).unwrap();
    add_layout(
        tmp.path(),
        "colemak_dh",
        COLEMAK_DH_KEYS,
        COLEMAK_DH_TEXT,
        Some(COLEMAK_DH_STATS),
    );

    let config = config::load_config(tmp.path()).unwrap();
    let store = frequency::load_store(&config.frequencies_path(tmp.path())).unwrap();
    TestSite { tmp, config, store }
}
