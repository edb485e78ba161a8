//! Configuration types for batch DOCX-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The skip set, the lock-file prefix and
//! the candidate format list live here as immutable data and are handed to the
//! discovery filter and the fallback driver; nothing in the crate keeps them
//! in mutable globals.

use crate::error::Docx2MdError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Default candidate list, most restrictive writer first.
///
/// The early entries switch off pandoc extensions that leak HTML, fenced
/// divs and bracketed spans into the output. Older pandoc releases reject
/// some of those extension names, so the list descends towards writers every
/// version accepts; `plain` always works.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "gfm-raw_html-fenced_divs-bracketed_spans",
    "gfm-raw_html-fenced_divs",
    "gfm-raw_html",
    "gfm",
    "markdown-raw_html",
    "markdown",
    "plain",
];

/// Directory names that are never descended into.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[".vs", "md_out", "__pycache__", ".git"];

/// Prefix Microsoft Office gives its owner/lock files (`~$report.docx`).
pub const OFFICE_LOCK_PREFIX: &str = "~$";

/// Ordered, immutable list of pandoc output-format specifiers.
///
/// Tried strictly in order by [`crate::pipeline::driver::convert_with_fallback`];
/// the first one pandoc accepts wins. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FormatCandidates(Vec<String>);

impl FormatCandidates {
    /// Build a candidate list, rejecting an empty list and blank entries.
    pub fn new<I, S>(formats: I) -> Result<Self, Docx2MdError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let formats: Vec<String> = formats
            .into_iter()
            .map(|f| f.into().trim().to_string())
            .collect();
        if formats.is_empty() {
            return Err(Docx2MdError::InvalidConfig(
                "at least one output format candidate is required".into(),
            ));
        }
        if let Some(pos) = formats.iter().position(|f| f.is_empty()) {
            return Err(Docx2MdError::InvalidConfig(format!(
                "output format candidate #{} is empty",
                pos + 1
            )));
        }
        Ok(Self(formats))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if there are no candidates, which `new` never allows.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for FormatCandidates {
    fn default() -> Self {
        Self(DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect())
    }
}

impl TryFrom<Vec<String>> for FormatCandidates {
    type Error = Docx2MdError;

    fn try_from(v: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<FormatCandidates> for Vec<String> {
    fn from(c: FormatCandidates) -> Self {
        c.0
    }
}

/// Configuration for a batch conversion run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use docx_batch2md::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .program("/opt/pandoc/bin/pandoc")
///     .candidates(["gfm", "plain"])
///     .skip_dir("drafts")
///     .build()
///     .unwrap();
/// assert_eq!(config.candidates.len(), 2);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Name or path of the pandoc executable. Default: `pandoc`.
    pub program: String,

    /// pandoc reader passed with `-f`. Default: `docx`.
    pub source_format: String,

    /// Extension (without dot) of the files to convert. Matched
    /// ASCII-case-insensitively. Default: `docx`.
    pub input_extension: String,

    /// Extension (without dot) given to output files. Default: `md`.
    ///
    /// Applied even when the `plain` writer wins, so every document ends up
    /// at a predictable path.
    pub output_extension: String,

    /// Appended to the output file stem to name its media directory.
    /// Default: `_media`.
    pub media_suffix: String,

    /// Fixed arguments added to every pandoc call. Default: `--wrap=none`,
    /// which keeps each paragraph on one line.
    pub extra_args: Vec<String>,

    /// Ordered output-format candidates.
    pub candidates: FormatCandidates,

    /// Directory names excluded from discovery, matched against every path
    /// component below the input root.
    pub skip_dirs: BTreeSet<String>,

    /// File-name prefix of office lock files, which are never converted.
    pub lock_prefix: String,

    /// Name of the append-only run log created in the output root.
    /// Default: `_convert_log.txt`.
    pub log_file_name: String,

    /// Output directory name used under the input root when no output root
    /// is given. Default: `md_out`.
    pub default_output_dir: String,

    /// Receives per-document events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            program: "pandoc".to_string(),
            source_format: "docx".to_string(),
            input_extension: "docx".to_string(),
            output_extension: "md".to_string(),
            media_suffix: "_media".to_string(),
            extra_args: vec!["--wrap=none".to_string()],
            candidates: FormatCandidates::default(),
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            lock_prefix: OFFICE_LOCK_PREFIX.to_string(),
            log_file_name: "_convert_log.txt".to_string(),
            default_output_dir: "md_out".to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("program", &self.program)
            .field("source_format", &self.source_format)
            .field("input_extension", &self.input_extension)
            .field("output_extension", &self.output_extension)
            .field("media_suffix", &self.media_suffix)
            .field("extra_args", &self.extra_args)
            .field("candidates", &self.candidates)
            .field("skip_dirs", &self.skip_dirs)
            .field("lock_prefix", &self.lock_prefix)
            .field("log_file_name", &self.log_file_name)
            .field("default_output_dir", &self.default_output_dir)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
            candidates: None,
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
    candidates: Option<Vec<String>>,
}

impl ConversionConfigBuilder {
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.config.program = program.into();
        self
    }

    pub fn source_format(mut self, format: impl Into<String>) -> Self {
        self.config.source_format = format.into();
        self
    }

    pub fn input_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.input_extension = strip_dot(ext.into());
        self
    }

    pub fn output_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.output_extension = strip_dot(ext.into());
        self
    }

    pub fn media_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.media_suffix = suffix.into();
        self
    }

    pub fn extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the candidate list. Validated in [`build`](Self::build).
    pub fn candidates<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Add one directory name to the skip set.
    pub fn skip_dir(mut self, name: impl Into<String>) -> Self {
        self.config.skip_dirs.insert(name.into());
        self
    }

    /// Replace the whole skip set.
    pub fn skip_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.skip_dirs = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn lock_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.lock_prefix = prefix.into();
        self
    }

    pub fn log_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.log_file_name = name.into();
        self
    }

    pub fn default_output_dir(mut self, name: impl Into<String>) -> Self {
        self.config.default_output_dir = name.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<ConversionConfig, Docx2MdError> {
        if let Some(formats) = self.candidates.take() {
            self.config.candidates = FormatCandidates::new(formats)?;
        }

        let c = &self.config;
        if c.program.trim().is_empty() {
            return Err(Docx2MdError::InvalidConfig(
                "converter program must not be empty".into(),
            ));
        }
        if c.input_extension.is_empty() || c.output_extension.is_empty() {
            return Err(Docx2MdError::InvalidConfig(
                "input and output extensions must not be empty".into(),
            ));
        }
        if c.media_suffix.is_empty() {
            return Err(Docx2MdError::InvalidConfig(
                "media suffix must not be empty".into(),
            ));
        }
        if c.log_file_name.is_empty() || c.log_file_name.contains(['/', '\\']) {
            return Err(Docx2MdError::InvalidConfig(format!(
                "log file name must be a bare file name, got {:?}",
                c.log_file_name
            )));
        }
        Ok(self.config)
    }
}

fn strip_dot(ext: String) -> String {
    ext.trim_start_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ConversionConfig::default();
        assert_eq!(c.program, "pandoc");
        assert_eq!(c.candidates.len(), 7);
        assert_eq!(
            c.candidates.iter().next(),
            Some("gfm-raw_html-fenced_divs-bracketed_spans")
        );
        assert_eq!(c.candidates.iter().last(), Some("plain"));
        assert!(c.skip_dirs.contains(".git"));
        assert!(c.skip_dirs.contains("md_out"));
        assert_eq!(c.lock_prefix, "~$");
        assert_eq!(c.extra_args, vec!["--wrap=none"]);
    }

    #[test]
    fn builder_rejects_empty_candidates() {
        let err = ConversionConfig::builder()
            .candidates(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, Docx2MdError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_blank_candidate() {
        let err = ConversionConfig::builder()
            .candidates(["gfm", "  "])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("#2"), "got: {err}");
    }

    #[test]
    fn builder_strips_extension_dots() {
        let c = ConversionConfig::builder()
            .input_extension(".DOCX")
            .output_extension(".markdown")
            .build()
            .unwrap();
        assert_eq!(c.input_extension, "DOCX");
        assert_eq!(c.output_extension, "markdown");
    }

    #[test]
    fn builder_rejects_log_name_with_separator() {
        assert!(ConversionConfig::builder()
            .log_file_name("logs/run.txt")
            .build()
            .is_err());
    }

    #[test]
    fn skip_dir_extends_defaults() {
        let c = ConversionConfig::builder().skip_dir("drafts").build().unwrap();
        assert!(c.skip_dirs.contains("drafts"));
        assert!(c.skip_dirs.contains(".vs"));
    }

    #[test]
    fn candidates_deserialize_validates() {
        let ok: FormatCandidates = serde_json::from_str(r#"["gfm","plain"]"#).unwrap();
        assert_eq!(ok.as_slice(), ["gfm", "plain"]);
        assert!(serde_json::from_str::<FormatCandidates>("[]").is_err());
    }
}
