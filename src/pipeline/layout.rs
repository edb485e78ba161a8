//! Output layout: where a document's Markdown and media end up.
//!
//! `<input_root>/a/b/report.docx` maps to
//!
//! ```text
//! <output_root>/a/b/report.md
//! <output_root>/a/b/report_media/   (images pandoc extracts)
//! ```

use crate::config::ConversionConfig;
use std::path::{Path, PathBuf};

/// All paths involved in converting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
    pub source: PathBuf,
    /// `source` relative to the input root.
    pub relative: PathBuf,
    pub output: PathBuf,
    pub media_dir: PathBuf,
}

impl DocumentPaths {
    /// Relative path with `/` separators, for logs and console output.
    pub fn display_relative(&self) -> String {
        self.relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Plan the output paths for `source`, which must live under `input_root`.
///
/// Returns `None` if `source` is not below `input_root`.
pub fn plan(
    input_root: &Path,
    output_root: &Path,
    source: &Path,
    config: &ConversionConfig,
) -> Option<DocumentPaths> {
    let relative = source.strip_prefix(input_root).ok()?.to_path_buf();
    let output = output_root
        .join(&relative)
        .with_extension(&config.output_extension);
    let media_dir = media_dir_for(&output, &config.media_suffix);

    Some(DocumentPaths {
        source: source.to_path_buf(),
        relative,
        output,
        media_dir,
    })
}

/// `<parent>/<stem><suffix>` next to the output file.
pub fn media_dir_for(output: &Path, suffix: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = output.parent().unwrap_or_else(|| Path::new(""));
    parent.join(format!("{stem}{suffix}"))
}
