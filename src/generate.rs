//! HTML page generation.
//!
//! Builds one page per layout from three fragments: the keyboard heat map
//! ([`crate::keyboard`]), the converted description ([`crate::text`]) and the
//! analyzer statistics ([`crate::stats`]). The page is written next to its
//! sources, overwriting any earlier build:
//!
//! ```text
//! colemak_dh/
//! ├── layout.txt
//! ├── info.txt
//! ├── stats.txt
//! └── template.html      # or index.html with `build --index`
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! The three fragments arrive as pre-rendered HTML and are inserted with
//! `PreEscaped`; everything else is escaped by maud.

use crate::config::{PageConfig, SiteConfig};
use crate::frequency::FrequencyTable;
use crate::keyboard;
use crate::layout::{LayoutDir, LayoutError};
use crate::stats;
use crate::text;
use crate::types::ManifestEntry;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which file name a generated page is written under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageFile {
    /// `template.html`, picked up by the site's own build.
    #[default]
    Template,
    /// `index.html`, served directly.
    Index,
}

impl PageFile {
    pub fn file_name(self) -> &'static str {
        match self {
            PageFile::Template => "template.html",
            PageFile::Index => "index.html",
        }
    }
}

/// The three HTML fragments a page is assembled from.
#[derive(Debug, Clone, Default)]
pub struct PageFragments {
    pub keyboard: String,
    pub text: String,
    pub stats: String,
}

/// A page that was written to disk.
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub path: PathBuf,
    /// Links in the description that were left unlinked.
    pub malformed_links: Vec<String>,
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, page: &PageConfig, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | " (page.site_title) }
                link rel="stylesheet" href=(page.stylesheet);
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the fixed navigation bar
fn site_nav(page: &PageConfig) -> Markup {
    html! {
        nav.site-nav {
            ul {
                @for link in &page.nav {
                    li { a href=(link.href) { (link.label) } }
                }
            }
        }
    }
}

/// Assemble a complete layout page from its fragments.
pub fn assemble_page(
    name: &str,
    language: &str,
    fragments: &PageFragments,
    page: &PageConfig,
) -> Markup {
    let content = html! {
        (site_nav(page))
        header.layout-header {
            h1 { (name) }
            p.layout-language { (language) }
        }
        article.layout {
            div.keyboard {
                (PreEscaped(&fragments.keyboard))
            }
            div.layout-text {
                (PreEscaped(&fragments.text))
            }
            div.layout-stats {
                p { (PreEscaped(&fragments.stats)) }
            }
        }
    };

    base_document(name, page, content)
}

// ============================================================================
// Page generation
// ============================================================================

/// Render the fragments for one layout without touching the output file.
pub fn render_fragments(
    dir: &LayoutDir,
    table: &FrequencyTable,
    config: &SiteConfig,
) -> Result<(PageFragments, Vec<String>), RenderError> {
    let keys = dir.read_keys()?;
    let converted = text::convert_file(&dir.text)?;
    let stats = stats::read_stats(&dir.stats)?;

    let fragments = PageFragments {
        keyboard: keyboard::render_keyboard(&keys, table, &config.keyboard, &config.heat),
        text: converted.to_html(),
        stats,
    };
    Ok((fragments, converted.malformed_links))
}

/// Render a layout's page and write it into the layout directory.
pub fn generate_page(
    root: &Path,
    entry: &ManifestEntry,
    table: &FrequencyTable,
    config: &SiteConfig,
    page_file: PageFile,
) -> Result<GeneratedPage, RenderError> {
    let dir = LayoutDir::new(root.join(entry.dir_name()), &config.files);
    let (fragments, malformed_links) = render_fragments(&dir, table, config)?;

    let language = crate::naming::title_case(&entry.language);
    let page = assemble_page(&entry.display_name(), &language, &fragments, &config.page);

    let path = dir.dir.join(page_file.file_name());
    fs::write(&path, page.into_string())?;

    Ok(GeneratedPage {
        path,
        malformed_links,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn fragments() -> PageFragments {
        PageFragments {
            keyboard: r#"<div class="key">e</div>"#.to_string(),
            text: "<h2>Overview</h2><section><p>Hi</p></section>".to_string(),
            stats: "Sfb:&nbsp;&nbsp;1%".to_string(),
        }
    }

    #[test]
    fn page_includes_doctype_and_title() {
        let html = assemble_page("Qwerty", "English", &fragments(), &PageConfig::default())
            .into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Qwerty | Keyboard Layouts</title>"));
        assert!(html.contains("<h1>Qwerty</h1>"));
        assert!(html.contains("English"));
    }

    #[test]
    fn page_embeds_fragments_unescaped() {
        let html = assemble_page("Qwerty", "English", &fragments(), &PageConfig::default())
            .into_string();
        assert!(html.contains(r#"<div class="key">e</div>"#));
        assert!(html.contains("<h2>Overview</h2>"));
        assert!(html.contains("Sfb:&nbsp;&nbsp;1%"));
    }

    #[test]
    fn page_renders_nav_links() {
        let html = assemble_page("Qwerty", "English", &fragments(), &PageConfig::default())
            .into_string();
        assert!(html.contains("site-nav"));
        assert!(html.contains(r#"href="/layouts/""#));
        assert!(html.contains(r#"href="/style.css""#));
    }

    #[test]
    fn layout_name_is_escaped() {
        let html = assemble_page("<b>x</b>", "English", &fragments(), &PageConfig::default())
            .into_string();
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    }

    #[test]
    fn page_file_names() {
        assert_eq!(PageFile::Template.file_name(), "template.html");
        assert_eq!(PageFile::Index.file_name(), "index.html");
    }

    #[test]
    fn generate_page_writes_template() {
        let site = setup_site();
        let entry = ManifestEntry::new("colemak dh", "english");
        let page = generate_page(
            site.root(),
            &entry,
            site.table("english"),
            &site.config,
            PageFile::Template,
        )
        .unwrap();

        assert_eq!(page.path, site.root().join("colemak_dh/template.html"));
        let html = fs::read_to_string(&page.path).unwrap();
        assert!(html.contains("<h1>Colemak Dh</h1>"));
        assert!(html.contains("Key usage: 12.0%"));
        assert!(html.contains("<h2>Overview</h2>"));
        assert!(html.contains("Sfb:&nbsp;&nbsp;"));
        assert!(page.malformed_links.is_empty());
    }

    #[test]
    fn generate_page_writes_index_when_asked() {
        let site = setup_site();
        let entry = ManifestEntry::new("Colemak DH", "English");
        let page = generate_page(
            site.root(),
            &entry,
            site.table("english"),
            &site.config,
            PageFile::Index,
        )
        .unwrap();
        assert!(page.path.ends_with("colemak_dh/index.html"));
        assert!(page.path.exists());
    }

    #[test]
    fn generate_page_overwrites_existing_file() {
        let site = setup_site();
        let target = site.root().join("colemak_dh/template.html");
        fs::write(&target, "stale").unwrap();
        let entry = ManifestEntry::new("colemak dh", "english");
        generate_page(
            site.root(),
            &entry,
            site.table("english"),
            &site.config,
            PageFile::Template,
        )
        .unwrap();
        assert_ne!(fs::read_to_string(&target).unwrap(), "stale");
    }

    #[test]
    fn missing_stats_is_render_error() {
        let site = setup_site();
        fs::remove_file(site.root().join("colemak_dh/stats.txt")).unwrap();
        let entry = ManifestEntry::new("colemak dh", "english");
        let result = generate_page(
            site.root(),
            &entry,
            site.table("english"),
            &site.config,
            PageFile::Template,
        );
        assert!(matches!(
            result,
            Err(RenderError::Layout(LayoutError::NotFound(_)))
        ));
        assert!(!site.root().join("colemak_dh/template.html").exists());
    }

    #[test]
    fn malformed_links_are_returned() {
        let site = setup_site();
        fs::write(
            site.root().join("colemak_dh/info.txt"),
            "See [Site](not a url).",
        )
        .unwrap();
        let entry = ManifestEntry::new("colemak dh", "english");
        let page = generate_page(
            site.root(),
            &entry,
            site.table("english"),
            &site.config,
            PageFile::Template,
        )
        .unwrap();
        assert_eq!(page.malformed_links, vec!["[Site](not a url)"]);
    }
}
