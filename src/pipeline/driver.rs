//! Fallback driver: try candidate writers in order until pandoc accepts one.
//!
//! ## Why a fallback list?
//!
//! The cleanest Markdown comes from `gfm` with raw HTML, fenced divs and
//! bracketed spans switched off. pandoc releases differ in which extension
//! names they accept, though, and an unknown name is a hard error. The
//! driver walks a list from most to least restrictive and keeps the first
//! writer that exits successfully. `plain` at the end works everywhere.
//!
//! A rejected candidate is deterministic for that input, so there is no
//! retry: exactly one attempt per candidate, stopping at the first success.
//! When every candidate fails, only the last diagnostic is surfaced.

use crate::config::FormatCandidates;
use crate::error::Docx2MdError;
use crate::output::{ConversionAttempt, ConversionOutcome};
use crate::pipeline::converter::{ConversionJob, ExternalConverter};
use crate::pipeline::normalize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Convert one document, trying `candidates` in order.
///
/// On success the output file holds normalized Markdown and the outcome
/// carries the winning format plus pandoc's warnings. On failure the outcome
/// carries the last candidate's diagnostic.
///
/// # Errors
/// Only filesystem problems: the output or media directory cannot be created,
/// or the converted file cannot be read back or rewritten.
pub fn convert_with_fallback<C>(
    converter: &C,
    job: &ConversionJob<'_>,
    candidates: &FormatCandidates,
) -> Result<ConversionOutcome, Docx2MdError>
where
    C: ExternalConverter + ?Sized,
{
    if let Some(parent) = job.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent)?;
    }
    create_dir(job.media_dir)?;

    let mut attempts: Vec<ConversionAttempt> = Vec::with_capacity(candidates.len());

    for format in candidates.iter() {
        let attempt = match converter.invoke(job, format) {
            Ok(out) if out.success => ConversionAttempt {
                candidate: format.to_string(),
                succeeded: true,
                diagnostic: out.warnings(),
            },
            Ok(out) => ConversionAttempt {
                candidate: format.to_string(),
                succeeded: false,
                diagnostic: out.diagnostic(),
            },
            Err(e) => ConversionAttempt {
                candidate: format.to_string(),
                succeeded: false,
                diagnostic: format!("failed to run converter: {e}"),
            },
        };

        if attempt.succeeded {
            debug!(input = %job.input.display(), format, "Candidate accepted");
            attempts.push(attempt);
            rewrite_normalized(job.output)?;
            info!(
                input = %job.input.display(),
                output = %job.output.display(),
                format,
                attempts = attempts.len(),
                "Converted document"
            );
            return Ok(ConversionOutcome::converted(attempts));
        }

        debug!(
            input = %job.input.display(),
            format,
            diagnostic = %attempt.diagnostic,
            "Candidate rejected"
        );
        attempts.push(attempt);
    }

    warn!(
        input = %job.input.display(),
        attempts = attempts.len(),
        "All candidate formats failed"
    );
    Ok(ConversionOutcome::exhausted(attempts))
}

fn create_dir(path: &Path) -> Result<(), Docx2MdError> {
    std::fs::create_dir_all(path).map_err(|source| Docx2MdError::CreateDirFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the converter's output, normalize it and write it back in place.
fn rewrite_normalized(output: &Path) -> Result<(), Docx2MdError> {
    let bytes = std::fs::read(output).map_err(|source| Docx2MdError::OutputReadFailed {
        path: output.to_path_buf(),
        source,
    })?;
    let raw = decode_lossy(bytes, output);
    let cleaned = normalize::clean_markdown(&raw);
    write_atomic(output, &cleaned)
}

/// Strict UTF-8 first; replacement characters only if that fails.
fn decode_lossy(bytes: Vec<u8>, path: &Path) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e.utf8_error(), "Converter output is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

/// Write to a temp file next to `path`, then rename over it.
fn write_atomic(path: &Path, contents: &str) -> Result<(), Docx2MdError> {
    let write_err = |source| Docx2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    // The temp file is created 0600; keep the mode pandoc's output had.
    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_err)?;
    }
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
