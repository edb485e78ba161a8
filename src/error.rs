//! Error types for the docx-batch2md library.
//!
//! Failures come in three sizes, and only one of them is an `Err`:
//!
//! * [`Docx2MdError`] — **Fatal or per-document I/O**: the external tool is
//!   missing, the input root does not exist, the run log cannot be written,
//!   or a single document's output directory/file could not be touched.
//!   Returned as `Err(Docx2MdError)`.
//!
//! * A rejected candidate format is **not** an error at all. It is recorded
//!   as a [`crate::output::ConversionAttempt`] and the driver moves on to the
//!   next candidate.
//!
//! * A document whose every candidate failed is a
//!   [`crate::output::ConversionOutcome`] with no chosen format. The batch
//!   logs it and continues with the next document.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the docx-batch2md library.
#[derive(Debug, Error)]
pub enum Docx2MdError {
    // ── Startup errors ────────────────────────────────────────────────────
    /// The external converter binary could not be spawned.
    #[error("'{program}' was not found.\nInstall pandoc (https://pandoc.org/installing.html) or pass --pandoc <PATH>.")]
    ToolNotFound { program: String },

    /// The external converter exists but its version probe failed.
    #[error("'{program}' failed to start: {detail}")]
    ToolFailed { program: String, detail: String },

    /// The input root is missing or is not a directory.
    #[error("Input directory not found: '{path}'")]
    InputNotFound { path: PathBuf },

    /// Walking the input tree failed.
    #[error("Failed to scan '{path}': {detail}")]
    Discovery { path: PathBuf, detail: String },

    // ── Per-document I/O errors ───────────────────────────────────────────
    /// Could not create an output or media directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converter reported success but its output could not be read back.
    #[error("Failed to read converter output '{path}': {source}")]
    OutputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write the normalized Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Run log ───────────────────────────────────────────────────────────
    /// The append-only run log could not be opened or written.
    #[error("Failed to write run log '{path}': {source}")]
    LogWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
