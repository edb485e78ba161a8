//! CLI binary for docx-batch2md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use docx_batch2md::{convert_dir, BatchReport, ConversionConfig, ConversionProgressCallback, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal reporter: one `[OK]` / `[FAIL]` line per document, printed above
/// an optional progress bar.
struct CliProgressCallback {
    /// `None` with `--no-progress`; lines are then printed directly.
    bar: Option<ProgressBar>,
}

impl CliProgressCallback {
    fn new(show_bar: bool) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0); // length set in on_batch_start
            let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(spinner_style);
            bar.set_prefix("Preparing");
            bar.set_message("Checking pandoc…");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Arc::new(Self { bar })
    }

    fn line(&self, text: String) {
        match &self.bar {
            Some(bar) => bar.println(text),
            None => eprintln!("{text}"),
        }
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_run_start(&self, tool_version: &str, input_root: &Path, output_root: &Path) {
        self.line(bold("=== DOCX -> Clean Markdown batch converter (fallback) ==="));
        self.line(format!("PANDOC   : {tool_version}"));
        self.line(format!("INPUT_DIR: {}", input_root.display()));
        self.line(format!("OUT_DIR  : {}", output_root.display()));
        self.line("-".repeat(56));
    }

    fn on_batch_start(&self, total_documents: usize) {
        if let Some(bar) = &self.bar {
            let progress_style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} documents  \
                 ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

            bar.set_length(total_documents as u64);
            bar.set_style(progress_style);
            bar.set_prefix("Converting");
        }
    }

    fn on_document_start(&self, _index: usize, _total: usize, relative: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(relative.to_string());
        }
    }

    fn on_document_converted(&self, relative: &str, format: &str) {
        self.line(format!("{}   {relative}  ->  {}", green("[OK]"), dim(format)));
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_document_failed(&self, relative: &str, _message: &str) {
        self.line(format!("{} {relative}", red("[FAIL]")));
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_batch_complete(&self, _succeeded: usize, _failed: usize) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every .docx below the current directory into ./md_out
  docx2md

  # Explicit input and output roots
  docx2md ~/Documents/specs -o ~/notes/specs

  # Only try two writers, in this order
  docx2md --format gfm --format plain docs/

  # Machine-readable report
  docx2md --json docs/ > report.json

OUTPUT LAYOUT:
  <input>/a/b/report.docx  ->  <output>/a/b/report.md
                               <output>/a/b/report_media/   (extracted images)
  <output>/_convert_log.txt    append-only log, one block per run

EXCLUDED:
  Directories named .vs, md_out, __pycache__, .git (extend with --skip-dir)
  Office lock files (~$*.docx)

ENVIRONMENT VARIABLES:
  DOCX2MD_OUTPUT      Output root
  DOCX2MD_PANDOC      pandoc executable
  DOCX2MD_FORMATS     Comma-separated candidate writers
  DOCX2MD_SKIP_DIRS   Comma-separated extra directory names to skip
  RUST_LOG            Overrides the log filter (e.g. docx_batch2md=debug)
"#;

/// Batch-convert DOCX documents to clean Markdown with pandoc.
#[derive(Parser, Debug)]
#[command(
    name = "docx2md",
    version,
    about = "Batch-convert DOCX documents to clean Markdown with pandoc",
    long_about = "Recursively converts every .docx below a directory to Markdown. Each document is \
tried against a list of pandoc writers, most restrictive first, until one is accepted; the result \
is cleaned of fenced divs, attribute groups and raw HTML tags.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory to scan for .docx files.
    #[arg(default_value = ".")]
    input: PathBuf,

    /// Output root. Default: <INPUT>/md_out.
    #[arg(short, long, env = "DOCX2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// pandoc executable name or path.
    #[arg(long, env = "DOCX2MD_PANDOC", default_value = "pandoc")]
    pandoc: String,

    /// Candidate pandoc writer, tried in the order given. Replaces the
    /// built-in list.
    #[arg(long = "format", env = "DOCX2MD_FORMATS", value_delimiter = ',')]
    formats: Vec<String>,

    /// Extra directory name to skip (in addition to the built-in set).
    #[arg(long = "skip-dir", env = "DOCX2MD_SKIP_DIRS", value_delimiter = ',')]
    skip_dirs: Vec<String>,

    /// Print the run report as JSON on stdout.
    #[arg(long, env = "DOCX2MD_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOCX2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCX2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCX2MD_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar and per-document lines are the user-facing output;
    // library INFO logs would interleave with them.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if cli.quiet {
        None
    } else {
        let cb = CliProgressCallback::new(show_progress);
        Some(cb as Arc<dyn ConversionProgressCallback>)
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run batch ────────────────────────────────────────────────────────
    let report = convert_dir(&cli.input, cli.output.as_deref(), &config)
        .context("Batch conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    }

    if !cli.quiet {
        print_summary(&report);
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder().program(&cli.pandoc);

    if !cli.formats.is_empty() {
        builder = builder.candidates(cli.formats.iter().cloned());
    }
    for dir in cli.skip_dirs.iter().filter(|d| !d.trim().is_empty()) {
        builder = builder.skip_dir(dir.trim());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(report: &BatchReport) {
    if report.documents.is_empty() {
        eprintln!("No .docx files found in: {}", report.input_root.display());
        return;
    }

    eprintln!();
    eprintln!(
        "{} {}",
        if report.failed == 0 { green("✔") } else { cyan("⚠") },
        bold("Done.")
    );
    eprintln!("Succeeded: {}", green(&report.succeeded.to_string()));
    eprintln!(
        "Failed:    {}",
        if report.failed == 0 {
            report.failed.to_string()
        } else {
            red(&report.failed.to_string())
        }
    );
    if let Some(ref log) = report.log_path {
        eprintln!("Log:       {}", dim(&log.display().to_string()));
    }
}
