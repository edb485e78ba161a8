//! The append-only run log, `<output_root>/_convert_log.txt`.
//!
//! Every run appends one block:
//!
//! ```text
//!
//! ================================================================================
//! RUN 2026-10-18T09:41:07
//! PANDOC: pandoc 3.1.9
//! INPUT : /docs
//! OUTPUT: /docs/md_out
//! FILES : 2
//! TO_CANDIDATES:
//!   - gfm-raw_html-fenced_divs-bracketed_spans
//!   - plain
//! ================================================================================
//! [WARN] a/spec.docx (gfm) :: [WARNING] Could not convert TeX math
//! [FAIL] broken.docx
//! [plain] Error: couldn't unpack docx container
//!
//! RESULT: ok=1, fail=1
//! ```
//!
//! Console output stays one line per document; the diagnostics live here.
//! Each entry is flushed immediately so an interrupted run still leaves a
//! readable log.

use crate::error::Docx2MdError;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const RULE_WIDTH: usize = 80;

/// Values printed in the block header.
#[derive(Debug, Clone, Copy)]
pub struct RunHeader<'a> {
    pub started: DateTime<Local>,
    pub tool_version: &'a str,
    pub input_root: &'a Path,
    pub output_root: &'a Path,
    pub files: usize,
    pub candidates: &'a [String],
}

/// An open run log. Created once per run and written sequentially.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl RunLog {
    /// Open (or create) the log for appending and write the run header.
    pub fn open(path: impl Into<PathBuf>, header: &RunHeader<'_>) -> Result<Self, Docx2MdError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Docx2MdError::LogWriteFailed {
                path: path.clone(),
                source,
            })?;
        let mut log = Self {
            path,
            writer: BufWriter::new(file),
        };
        log.write_entry(&render_header(header))?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A document converted, but pandoc printed something on stderr.
    pub fn warning(&mut self, relative: &str, format: &str, message: &str) -> Result<(), Docx2MdError> {
        self.write_entry(&format!("[WARN] {relative} ({format}) :: {message}\n"))
    }

    /// A document failed. `last_format` is the candidate whose diagnostic
    /// follows; `None` for I/O failures outside the candidate loop.
    pub fn failure(
        &mut self,
        relative: &str,
        last_format: Option<&str>,
        message: &str,
    ) -> Result<(), Docx2MdError> {
        let detail = match last_format {
            Some(format) => format!("[{format}] {message}"),
            None => message.to_string(),
        };
        self.write_entry(&format!("[FAIL] {relative}\n{detail}\n\n"))
    }

    /// Close the block with the success/failure counts.
    pub fn finish(mut self, succeeded: usize, failed: usize) -> Result<PathBuf, Docx2MdError> {
        self.write_entry(&format!("RESULT: ok={succeeded}, fail={failed}\n"))?;
        Ok(self.path)
    }

    fn write_entry(&mut self, text: &str) -> Result<(), Docx2MdError> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|source| Docx2MdError::LogWriteFailed {
                path: self.path.clone(),
                source,
            })
    }
}

fn render_header(h: &RunHeader<'_>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let candidates = h
        .candidates
        .iter()
        .map(|c| format!("  - {c}\n"))
        .collect::<String>();
    format!(
        "\n{rule}\n\
         RUN {started}\n\
         PANDOC: {version}\n\
         INPUT : {input}\n\
         OUTPUT: {output}\n\
         FILES : {files}\n\
         TO_CANDIDATES:\n\
         {candidates}\
         {rule}\n",
        started = h.started.format("%Y-%m-%dT%H:%M:%S"),
        version = h.tool_version,
        input = h.input_root.display(),
        output = h.output_root.display(),
        files = h.files,
    )
}
