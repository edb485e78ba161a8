//! Batch entry points: convert every DOCX below a directory.
//!
//! ## Run sequence
//!
//! 1. Probe the converter (`pandoc --version`). Failure aborts the run before
//!    anything is touched.
//! 2. Resolve the input root and the output root (default
//!    `<input>/md_out`), creating the latter.
//! 3. Discover documents (skip set + lock-file filter, sorted).
//! 4. Open the run log and write its header.
//! 5. For each document, strictly one after another: plan its paths, run the
//!    fallback driver, record the result in the log and the progress callback.
//! 6. Append the `RESULT:` line and return a [`BatchReport`].
//!
//! Per-document problems never abort the batch; only the startup probe, an
//! unusable input/output root, and run-log write errors do.

use crate::config::ConversionConfig;
use crate::error::Docx2MdError;
use crate::output::{BatchReport, DocumentReport, DocumentStatus};
use crate::pipeline::converter::{ConversionJob, ExternalConverter, PandocConverter};
use crate::pipeline::layout::{self, DocumentPaths};
use crate::pipeline::{discover, driver};
use crate::runlog::{RunHeader, RunLog};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Convert every document under `input_root` with the system `pandoc`.
///
/// `output_root` defaults to `<input_root>/<config.default_output_dir>`.
///
/// # Errors
/// Returns `Err` only for run-level failures: pandoc missing or broken, the
/// input root missing, the output root or run log not writable. Documents
/// that fail to convert are reported in the returned [`BatchReport`].
pub fn convert_dir(
    input_root: impl AsRef<Path>,
    output_root: Option<&Path>,
    config: &ConversionConfig,
) -> Result<BatchReport, Docx2MdError> {
    let converter = PandocConverter::from_config(config);
    convert_dir_with(&converter, input_root, output_root, config)
}

/// Same as [`convert_dir`] with a caller-supplied converter.
pub fn convert_dir_with<C>(
    converter: &C,
    input_root: impl AsRef<Path>,
    output_root: Option<&Path>,
    config: &ConversionConfig,
) -> Result<BatchReport, Docx2MdError>
where
    C: ExternalConverter + ?Sized,
{
    let start = Instant::now();

    // ── Step 1: Probe the tool ───────────────────────────────────────────
    let tool_version = converter.version()?;
    info!(version = %tool_version, "Converter available");

    // ── Step 2: Resolve roots ────────────────────────────────────────────
    let input_root = resolve_input_root(input_root.as_ref())?;
    let output_root = match output_root {
        Some(p) => p.to_path_buf(),
        None => input_root.join(&config.default_output_dir),
    };
    let output_root = prepare_output_root(&output_root)?;
    info!(input = %input_root.display(), output = %output_root.display(), "Resolved roots");

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(&tool_version, &input_root, &output_root);
    }

    // ── Step 3: Discover ─────────────────────────────────────────────────
    let sources = discover::discover(&input_root, config)?;
    let candidates = config.candidates.as_slice().to_vec();

    if sources.is_empty() {
        info!(input = %input_root.display(), "No documents found");
        return Ok(BatchReport {
            tool_version,
            input_root,
            output_root,
            log_path: None,
            candidates,
            documents: Vec::new(),
            succeeded: 0,
            failed: 0,
            duration_ms: start.elapsed().as_millis() as u64,
        });
    }
    info!(documents = sources.len(), "Discovered documents");

    // ── Step 4: Open the run log ─────────────────────────────────────────
    let mut log = RunLog::open(
        output_root.join(&config.log_file_name),
        &RunHeader {
            started: chrono::Local::now(),
            tool_version: &tool_version,
            input_root: &input_root,
            output_root: &output_root,
            files: sources.len(),
            candidates: &candidates,
        },
    )?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(sources.len());
    }

    // ── Step 5: Convert, one document at a time ──────────────────────────
    let total = sources.len();
    let mut documents = Vec::with_capacity(total);
    for (i, source) in sources.iter().enumerate() {
        let Some(paths) = layout::plan(&input_root, &output_root, source, config) else {
            warn!(path = %source.display(), "Document outside input root, skipping");
            continue;
        };
        let relative = paths.display_relative();

        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(i + 1, total, &relative);
        }

        let status = convert_document(converter, &paths, config);
        record(&mut log, &relative, &status)?;

        if let Some(ref cb) = config.progress_callback {
            match &status {
                DocumentStatus::Converted { format, .. } => cb.on_document_converted(&relative, format),
                DocumentStatus::Failed { diagnostic, .. } => cb.on_document_failed(&relative, diagnostic),
                DocumentStatus::Error { message } => cb.on_document_failed(&relative, message),
            }
        }

        documents.push(DocumentReport {
            relative,
            source: paths.source,
            output: paths.output,
            media_dir: paths.media_dir,
            status,
        });
    }

    // ── Step 6: Summarise ────────────────────────────────────────────────
    let succeeded = documents.iter().filter(|d| d.succeeded()).count();
    let failed = documents.len() - succeeded;
    let log_path = log.finish(succeeded, failed)?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(succeeded, failed);
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(succeeded, failed, duration_ms, "Batch complete");

    Ok(BatchReport {
        tool_version,
        input_root,
        output_root,
        log_path: Some(log_path),
        candidates,
        documents,
        succeeded,
        failed,
        duration_ms,
    })
}

/// Run the fallback driver for one planned document.
///
/// I/O errors are folded into [`DocumentStatus::Error`] so the batch can move
/// on to the next document.
pub fn convert_document<C>(
    converter: &C,
    paths: &DocumentPaths,
    config: &ConversionConfig,
) -> DocumentStatus
where
    C: ExternalConverter + ?Sized,
{
    let job = ConversionJob {
        input: &paths.source,
        output: &paths.output,
        media_dir: &paths.media_dir,
    };
    match driver::convert_with_fallback(converter, &job, &config.candidates) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            warn!(path = %paths.source.display(), error = %e, "Document failed");
            DocumentStatus::Error {
                message: e.to_string(),
            }
        }
    }
}

fn record(log: &mut RunLog, relative: &str, status: &DocumentStatus) -> Result<(), Docx2MdError> {
    match status {
        DocumentStatus::Converted {
            format, warnings, ..
        } if !warnings.is_empty() => log.warning(relative, format, warnings),
        DocumentStatus::Converted { .. } => Ok(()),
        DocumentStatus::Failed {
            last_format,
            diagnostic,
            ..
        } => log.failure(relative, last_format.as_deref(), diagnostic),
        DocumentStatus::Error { message } => log.failure(relative, None, message),
    }
}

fn resolve_input_root(path: &Path) -> Result<PathBuf, Docx2MdError> {
    if !path.is_dir() {
        return Err(Docx2MdError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    dunce::canonicalize(path).map_err(|e| Docx2MdError::Discovery {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

fn prepare_output_root(path: &Path) -> Result<PathBuf, Docx2MdError> {
    std::fs::create_dir_all(path).map_err(|source| Docx2MdError::CreateDirFailed {
        path: path.to_path_buf(),
        source,
    })?;
    dunce::canonicalize(path).map_err(|source| Docx2MdError::CreateDirFailed {
        path: path.to_path_buf(),
        source,
    })
}
