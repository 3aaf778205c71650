use clap::{Parser, Subcommand};
use layout_pages::generate::PageFile;
use layout_pages::types::ManifestEntry;
use layout_pages::{config, frequency, output, queue};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; main runs this a single time
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "layout-pages")]
#[command(about = "Static page generator for keyboard layout docs")]
#[command(long_about = "\
Static page generator for keyboard layout docs

Each layout directory becomes one HTML page: a keyboard heat map colored by
character frequency, the layout's description, and its analyzer statistics.
Only layouts listed in the update manifest are rebuilt.

Site structure:

  site/
  ├── config.toml          # Site config (optional)
  ├── frequencies.json     # {\"english\": {\"e\": 0.12, ...}, ...}
  ├── queue.txt            # Pending layouts, one \"Name ~ Language\" per line
  └── colemak_dh/          # Layout directory: lowercase, spaces and dashes → underscores
      ├── layout.txt       # Keys, whitespace-delimited
      ├── info.txt         # Description (markdown subset)
      └── stats.txt        # Analyzer output

Entries that fail to render stay in the manifest for the next run.

Run 'layout-pages gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render every layout in the manifest (default)
    Build {
        /// Write index.html instead of template.html
        #[arg(long)]
        index: bool,
    },
    /// Validate the manifest without rendering
    Check,
    /// Add a layout to the manifest
    Enqueue {
        /// Layout name, e.g. "Colemak DH"
        name: String,
        /// Language of the frequency table to color with
        language: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let root = cli.root;

    match cli.command.unwrap_or(Command::Build { index: false }) {
        Command::Build { index } => {
            let site_config = config::load_config(&root)?;
            let store = frequency::load_store(&site_config.frequencies_path(&root))?;
            let page_file = if index {
                PageFile::Index
            } else {
                PageFile::Template
            };
            let report = queue::run_batch(&root, &site_config, &store, page_file)?;
            output::print_batch_report(&report, &root);
        }
        Command::Check => {
            let site_config = config::load_config(&root)?;
            let store = frequency::load_store(&site_config.frequencies_path(&root))?;
            println!("==> Checking {}", site_config.manifest_path(&root).display());
            let (manifest, plan) = queue::plan_batch(&root, &site_config, &store)?;
            output::print_plan(&manifest, &plan, &root);
        }
        Command::Enqueue { name, language } => {
            let site_config = config::load_config(&root)?;
            let entry = ManifestEntry::new(name, language);
            if queue::enqueue(&site_config.manifest_path(&root), &entry)? {
                println!("Queued {}", entry.to_line());
            } else {
                println!("Already queued: {}", entry.to_line());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
