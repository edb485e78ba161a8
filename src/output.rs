//! Result types: per-attempt, per-document and per-run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One invocation of the converter with one candidate format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionAttempt {
    /// The format specifier passed with `-t`.
    pub candidate: String,
    pub succeeded: bool,
    /// Trimmed stderr (or stdout when stderr was empty). On success this is
    /// whatever warnings the tool printed.
    pub diagnostic: String,
}

/// Terminal result of converting one document.
///
/// `chosen_format` is `Some` exactly when the conversion succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub chosen_format: Option<String>,
    /// Warnings of the winning attempt on success; the last attempt's
    /// diagnostic on failure.
    pub message: String,
    /// Every attempt made, in order. The last one is the winner on success.
    pub attempts: Vec<ConversionAttempt>,
}

impl ConversionOutcome {
    pub(crate) fn converted(attempts: Vec<ConversionAttempt>) -> Self {
        let last = attempts.last();
        Self {
            chosen_format: last.map(|a| a.candidate.clone()),
            message: last.map(|a| a.diagnostic.clone()).unwrap_or_default(),
            attempts,
        }
    }

    pub(crate) fn exhausted(attempts: Vec<ConversionAttempt>) -> Self {
        Self {
            chosen_format: None,
            message: attempts
                .last()
                .map(|a| a.diagnostic.clone())
                .unwrap_or_default(),
            attempts,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.chosen_format.is_some()
    }

    /// The candidate tried last (the winner, or the final failure).
    pub fn last_candidate(&self) -> Option<&str> {
        self.attempts.last().map(|a| a.candidate.as_str())
    }
}

/// What happened to one discovered document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Path relative to the input root, `/`-separated.
    pub relative: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub media_dir: PathBuf,
    pub status: DocumentStatus,
}

impl DocumentReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, DocumentStatus::Converted { .. })
    }
}

/// Per-document status, tagged for JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// A candidate succeeded. `warnings` is the tool's stderr, possibly empty.
    Converted {
        format: String,
        warnings: String,
        attempts: usize,
    },
    /// Every candidate failed; `diagnostic` is the last candidate's.
    Failed {
        last_format: Option<String>,
        diagnostic: String,
        attempts: usize,
    },
    /// An I/O error stopped the document before or after conversion.
    Error { message: String },
}

impl From<ConversionOutcome> for DocumentStatus {
    fn from(outcome: ConversionOutcome) -> Self {
        let attempts = outcome.attempts.len();
        match outcome.chosen_format {
            Some(format) => DocumentStatus::Converted {
                format,
                warnings: outcome.message,
                attempts,
            },
            None => DocumentStatus::Failed {
                last_format: outcome.attempts.last().map(|a| a.candidate.clone()),
                diagnostic: outcome.message,
                attempts,
            },
        }
    }
}

/// Summary of a whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// First line of `pandoc --version`.
    pub tool_version: String,
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// `None` when no documents were found and no log was written.
    pub log_path: Option<PathBuf>,
    pub candidates: Vec<String>,
    pub documents: Vec<DocumentReport>,
    pub succeeded: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(candidate: &str, succeeded: bool, diagnostic: &str) -> ConversionAttempt {
        ConversionAttempt {
            candidate: candidate.into(),
            succeeded,
            diagnostic: diagnostic.into(),
        }
    }

    #[test]
    fn converted_outcome_takes_last_attempt() {
        let o = ConversionOutcome::converted(vec![
            attempt("gfm-raw_html", false, "Unknown extension"),
            attempt("gfm", true, "[WARNING] image skipped"),
        ]);
        assert!(o.succeeded());
        assert_eq!(o.chosen_format.as_deref(), Some("gfm"));
        assert_eq!(o.message, "[WARNING] image skipped");
    }

    #[test]
    fn exhausted_outcome_has_no_format() {
        let o = ConversionOutcome::exhausted(vec![
            attempt("gfm", false, "first"),
            attempt("plain", false, "second"),
        ]);
        assert!(!o.succeeded());
        assert_eq!(o.message, "second");
        assert_eq!(o.last_candidate(), Some("plain"));
    }

    #[test]
    fn status_json_is_tagged() {
        let status = DocumentStatus::from(ConversionOutcome::exhausted(vec![attempt(
            "plain", false, "bad zip",
        )]));
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["last_format"], "plain");
        assert_eq!(json["attempts"], 1);
    }
}
