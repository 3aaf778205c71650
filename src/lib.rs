//! # Layout Pages
//!
//! A minimal static site generator for keyboard layout documentation. Each
//! layout is a directory holding its key sequence, a short description and the
//! output of an external layout analyzer; each one becomes a single HTML page
//! with a frequency heat map of the keyboard.
//!
//! # Architecture: Queue-Driven Batch
//!
//! Pages are not rebuilt wholesale. A plain text manifest lists the layouts
//! that changed, and a run drains it:
//!
//! ```text
//! queue.txt ──► check entry ──► render fragments ──► assemble page ──► <layout>/template.html
//!                  │                   │
//!                  └─ skipped          └─ failed → written back to queue.txt
//! ```
//!
//! Every entry is rendered from a fresh read of its own files; a failure in
//! one entry never affects another. The frequency store is loaded once per run
//! and shared read-only.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, defaults, validation |
//! | [`frequency`] | Per-language character frequency tables |
//! | [`layout`] | Layout directory contract and key file reader |
//! | [`keyboard`] | Heat score, color ramp, key tile markup |
//! | [`text`] | Markdown-subset description → HTML sections |
//! | [`stats`] | Analyzer statistics block → embeddable HTML |
//! | [`generate`] | Page assembly with Maud and output file writing |
//! | [`queue`] | Manifest parsing, entry validation, batch run |
//! | [`naming`] | Directory / display / manifest spellings of names |
//! | [`types`] | Shared types: manifest entries, outcomes, diagnostics |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Typed Outcomes Over Catch-All
//!
//! Rendering errors are ordinary `Result`s. The batch driver turns each one
//! into an [`types::EntryOutcome`] so a broken layout is reported and requeued
//! without aborting the rest of the run.
//!
//! ## Advisory Diagnostics
//!
//! A malformed manifest line or link is not an error. It is collected as a
//! [`types::Diagnostic`], printed once, and the run carries on.
//!
//! ## Maud Over Template Engines
//!
//! Page chrome is generated with [Maud](https://maud.lambda.xyz/), so it is
//! checked at compile time and escaped by default. The converted description,
//! keyboard and stats fragments are inserted pre-escaped.

pub mod config;
pub mod frequency;
pub mod generate;
pub mod keyboard;
pub mod layout;
pub mod naming;
pub mod output;
pub mod queue;
pub mod stats;
pub mod text;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
