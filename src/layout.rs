//! Per-layout filesystem contract.
//!
//! Every layout lives in its own directory under the site root, named after
//! the layout (see [`crate::naming::dir_name`]):
//!
//! ```text
//! colemak_dh/
//! ├── layout.txt      # Key characters, whitespace-delimited, in key order
//! ├── info.txt        # Free-text description (markdown subset)
//! ├── stats.txt       # Analyzer output, copied in verbatim by an external tool
//! └── template.html   # Generated page
//! ```
//!
//! File names come from [`crate::config::FilesConfig`].

use crate::config::FilesConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("required file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Paths of one layout's files.
#[derive(Debug, Clone)]
pub struct LayoutDir {
    pub dir: PathBuf,
    pub layout: PathBuf,
    pub text: PathBuf,
    pub stats: PathBuf,
}

impl LayoutDir {
    pub fn new(dir: impl Into<PathBuf>, files: &FilesConfig) -> Self {
        let dir = dir.into();
        Self {
            layout: dir.join(&files.layout),
            text: dir.join(&files.text),
            stats: dir.join(&files.stats),
            dir,
        }
    }

    /// Files that must exist before rendering is attempted.
    ///
    /// The stats file is not listed: it is checked while rendering, so a
    /// layout whose analyzer run hasn't landed yet fails and stays queued.
    pub fn required_files(&self) -> [&Path; 2] {
        [&self.layout, &self.text]
    }

    /// First required file that is absent, if any.
    pub fn first_missing(&self) -> Option<&Path> {
        self.required_files().into_iter().find(|p| !p.is_file())
    }

    pub fn read_keys(&self) -> Result<Vec<char>, LayoutError> {
        read_keys(&self.layout)
    }
}

/// Read a file that must exist, mapping absence to [`LayoutError::NotFound`].
pub fn read_required(path: &Path) -> Result<String, LayoutError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LayoutError::NotFound(path.to_path_buf()),
        _ => LayoutError::Io(e),
    })
}

/// Read a file that may be absent; absence reads as empty text.
pub fn read_optional(path: &Path) -> Result<String, LayoutError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(LayoutError::Io(e)),
    }
}

/// Key characters of a layout, in order.
///
/// Whitespace only separates keys; a token of several characters contributes
/// each of its characters as a key.
pub fn parse_keys(content: &str) -> Vec<char> {
    content.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Read and parse a layout-key file.
pub fn read_keys(path: &Path) -> Result<Vec<char>, LayoutError> {
    read_required(path).map(|content| parse_keys(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_keys_drops_whitespace() {
        let keys = parse_keys("q w e r t  y u i o p\na s d f g\th j k l ;\n");
        assert_eq!(keys.len(), 20);
        assert_eq!(keys[0], 'q');
        assert_eq!(keys[19], ';');
    }

    #[test]
    fn parse_keys_empty() {
        assert!(parse_keys(" \n\t ").is_empty());
    }

    #[test]
    fn read_keys_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = read_keys(&tmp.path().join("layout.txt"));
        assert!(matches!(result, Err(LayoutError::NotFound(_))));
    }

    #[test]
    fn read_optional_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let text = read_optional(&tmp.path().join("info.txt")).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn layout_dir_paths_follow_config() {
        let files = FilesConfig::default();
        let dir = LayoutDir::new("/site/qwerty", &files);
        assert_eq!(dir.layout, PathBuf::from("/site/qwerty/layout.txt"));
        assert_eq!(dir.text, PathBuf::from("/site/qwerty/info.txt"));
        assert_eq!(dir.stats, PathBuf::from("/site/qwerty/stats.txt"));
    }

    #[test]
    fn first_missing_reports_absent_file() {
        let tmp = TempDir::new().unwrap();
        let dir = LayoutDir::new(tmp.path(), &FilesConfig::default());
        fs::write(&dir.layout, "a b c").unwrap();
        assert_eq!(dir.first_missing(), Some(dir.text.as_path()));

        fs::write(&dir.text, "").unwrap();
        assert_eq!(dir.first_missing(), None);
    }

    #[test]
    fn read_keys_through_layout_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = LayoutDir::new(tmp.path(), &FilesConfig::default());
        fs::write(&dir.layout, "e t\na").unwrap();
        assert_eq!(dir.read_keys().unwrap(), vec!['e', 't', 'a']);
    }
}
