//! The external converter seam.
//!
//! pandoc does the actual DOCX parsing; this crate only decides *which*
//! writer to ask for and cleans up what comes back. [`ExternalConverter`]
//! is the boundary: [`PandocConverter`] shells out to the real binary, tests
//! plug in fakes that succeed or fail per candidate.

use crate::config::ConversionConfig;
use crate::error::Docx2MdError;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Paths for one conversion attempt.
#[derive(Debug, Clone, Copy)]
pub struct ConversionJob<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub media_dir: &'a Path,
}

/// Captured result of one converter process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `true` when the process exited with status 0.
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Trimmed stderr, or trimmed stdout when stderr is empty.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }

    /// Trimmed stderr only; what a successful run printed as warnings.
    pub fn warnings(&self) -> String {
        self.stderr.trim().to_string()
    }
}

/// An external document converter invoked once per candidate format.
pub trait ExternalConverter {
    /// Probe the tool once before any document is processed.
    ///
    /// Returns a one-line version string. A missing binary or a failing probe
    /// is fatal for the whole run.
    fn version(&self) -> Result<String, Docx2MdError>;

    /// Convert `job.input` into `job.output` using writer `format`.
    ///
    /// `Ok` means the process ran, whatever its exit status. `Err` means it
    /// could not be started at all.
    fn invoke(&self, job: &ConversionJob<'_>, format: &str) -> io::Result<ToolOutput>;
}

/// Runs the `pandoc` binary.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: PathBuf,
    source_format: String,
    extra_args: Vec<String>,
}

impl PandocConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            source_format: "docx".to_string(),
            extra_args: vec!["--wrap=none".to_string()],
        }
    }

    pub fn from_config(config: &ConversionConfig) -> Self {
        Self {
            program: PathBuf::from(&config.program),
            source_format: config.source_format.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    /// Arguments for one attempt, in the order pandoc receives them.
    pub fn arguments(&self, job: &ConversionJob<'_>, format: &str) -> Vec<OsString> {
        let mut extract_media = OsString::from("--extract-media=");
        extract_media.push(job.media_dir.as_os_str());

        let mut args: Vec<OsString> = vec![
            "-f".into(),
            self.source_format.clone().into(),
            "-t".into(),
            format.into(),
            extract_media,
        ];
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push(job.input.as_os_str().to_owned());
        args.push("-o".into());
        args.push(job.output.as_os_str().to_owned());
        args
    }
}

impl ExternalConverter for PandocConverter {
    fn version(&self) -> Result<String, Docx2MdError> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Docx2MdError::ToolNotFound {
                    program: self.program_name(),
                },
                _ => Docx2MdError::ToolFailed {
                    program: self.program_name(),
                    detail: e.to_string(),
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Docx2MdError::ToolFailed {
                program: self.program_name(),
                detail: format!("{} {}", output.status, stderr.trim()).trim().to_string(),
            });
        }

        Ok(first_line_or_unknown(&String::from_utf8_lossy(&output.stdout)))
    }

    fn invoke(&self, job: &ConversionJob<'_>, format: &str) -> io::Result<ToolOutput> {
        let args = self.arguments(job, format);
        debug!(program = %self.program.display(), ?args, "Invoking converter");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()?;

        Ok(ToolOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn first_line_or_unknown(stdout: &str) -> String {
    stdout
        .lines()
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or("pandoc (version unknown)")
        .to_string()
}
