//! # docx-batch2md
//!
//! Batch-convert DOCX documents to clean Markdown with pandoc.
//!
//! ## Why this crate?
//!
//! pandoc reads DOCX very well, but the Markdown it writes depends on the
//! writer and extensions you ask for, and which extension names are accepted
//! depends on the installed pandoc version. Ask for too much and pandoc
//! refuses; ask for too little and the output is littered with `:::` fenced
//! divs, `{.underline}` attribute groups and raw `<span>` tags. This crate
//! tries a descending list of writers until one is accepted, then scrubs the
//! residue with a deterministic normalization pass.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input dir
//!  │
//!  ├─ 1. Probe    `pandoc --version` once; missing tool aborts the run
//!  ├─ 2. Discover recursive walk, skip set + `~$` lock files excluded
//!  ├─ 3. Layout   <out>/P.md and <out>/P_media/ per document
//!  ├─ 4. Driver   try candidate writers in order, first success wins
//!  ├─ 5. Clean    normalization rules, rewrite the .md in place
//!  └─ 6. Log      append-only _convert_log.txt + per-run report
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docx_batch2md::{convert_dir, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let report = convert_dir("docs", None, &config)?;
//!     println!("ok={} fail={}", report.succeeded, report.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docx2md` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod runlog;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{convert_dir, convert_dir_with, convert_document};
pub use config::{ConversionConfig, ConversionConfigBuilder, FormatCandidates};
pub use error::Docx2MdError;
pub use output::{BatchReport, ConversionAttempt, ConversionOutcome, DocumentReport, DocumentStatus};
pub use pipeline::converter::{ConversionJob, ExternalConverter, PandocConverter, ToolOutput};
pub use pipeline::driver::convert_with_fallback;
pub use pipeline::normalize::clean_markdown;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
