//! Batch integration tests.
//!
//! A scripted [`ExternalConverter`] stands in for pandoc, so these run
//! anywhere without the real tool installed.
//!
//! Run with:
//!   cargo test --test batch -- --nocapture

use docx_batch2md::{
    convert_dir, convert_dir_with, ConversionConfig, ConversionJob, ConversionProgressCallback,
    Docx2MdError, DocumentStatus, ExternalConverter, ToolOutput,
};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Accepts a document with the first candidate in `accepted`; fails
/// everything else with `"<format> rejected"`.
struct ScriptedConverter {
    accepted: Vec<&'static str>,
    body: &'static str,
    warnings: &'static str,
    version: Result<&'static str, ()>,
    calls: RefCell<Vec<(PathBuf, String)>>,
}

impl ScriptedConverter {
    fn accepting(accepted: &[&'static str]) -> Self {
        Self {
            accepted: accepted.to_vec(),
            body: "::: {.title}\nTitle {#t}\n:::\n\n\n\n<span>Body</span> text\n",
            warnings: "",
            version: Ok("pandoc 3.1.9"),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn formats_tried_for(&self, name: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|(p, _)| p.file_name().is_some_and(|n| n == name))
            .map(|(_, f)| f.clone())
            .collect()
    }

    fn inputs(&self) -> Vec<PathBuf> {
        let mut v: Vec<PathBuf> = self.calls.borrow().iter().map(|(p, _)| p.clone()).collect();
        v.dedup();
        v
    }
}

impl ExternalConverter for ScriptedConverter {
    fn version(&self) -> Result<String, Docx2MdError> {
        self.version
            .map(str::to_string)
            .map_err(|()| Docx2MdError::ToolNotFound {
                program: "pandoc".into(),
            })
    }

    fn invoke(&self, job: &ConversionJob<'_>, format: &str) -> io::Result<ToolOutput> {
        self.calls
            .borrow_mut()
            .push((job.input.to_path_buf(), format.to_string()));
        if self.accepted.contains(&format) {
            fs::write(job.output, self.body)?;
            Ok(ToolOutput {
                success: true,
                stdout: String::new(),
                stderr: self.warnings.to_string(),
            })
        } else {
            Ok(ToolOutput {
                success: false,
                stdout: String::new(),
                stderr: format!("{format} rejected\n"),
            })
        }
    }
}

fn touch(root: &Path, rel: &str) -> PathBuf {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(&p, b"PK\x03\x04").unwrap();
    p
}

// ── Fallback order ───────────────────────────────────────────────────────────

#[test]
fn fourth_candidate_wins_and_later_ones_are_not_tried() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "report.docx");
    let config = ConversionConfig::default();
    let fourth = config.candidates.as_slice()[3].clone();
    let fake = ScriptedConverter::accepting(&["gfm", "plain"]);
    assert_eq!(fourth, "gfm");

    let report = convert_dir_with(&fake, dir.path(), None, &config).unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 0);
    match &report.documents[0].status {
        DocumentStatus::Converted {
            format, attempts, ..
        } => {
            assert_eq!(format, &fourth);
            assert_eq!(*attempts, 4);
        }
        other => panic!("expected conversion, got {other:?}"),
    }
    assert_eq!(
        fake.formats_tried_for("report.docx"),
        config.candidates.as_slice()[..4].to_vec()
    );

    let md = fs::read_to_string(dir.path().join("md_out/report.md")).unwrap();
    assert_eq!(md, "Title\n\nBody text\n");
    assert!(dir.path().join("md_out/report_media").is_dir());
}

#[test]
fn all_candidates_fail_surfaces_last_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "broken.docx");
    touch(dir.path(), "zz_after.docx");
    let config = ConversionConfig::builder()
        .candidates(["gfm-raw_html", "markdown", "plain"])
        .build()
        .unwrap();
    let fake = ScriptedConverter::accepting(&[]);

    let report = convert_dir_with(&fake, dir.path(), None, &config).unwrap();

    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed, 2, "batch continues after a failed document");
    match &report.documents[0].status {
        DocumentStatus::Failed {
            last_format,
            diagnostic,
            attempts,
        } => {
            assert_eq!(last_format.as_deref(), Some("plain"));
            assert_eq!(diagnostic, "plain rejected");
            assert_eq!(*attempts, 3);
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!dir.path().join("md_out/broken.md").exists());

    let log = fs::read_to_string(report.log_path.unwrap()).unwrap();
    assert!(log.contains("[FAIL] broken.docx\n[plain] plain rejected\n\n"));
    assert!(!log.contains("markdown rejected"), "only the last diagnostic is logged");
    assert!(log.ends_with("RESULT: ok=0, fail=2\n"));
}

// ── Exclusions ───────────────────────────────────────────────────────────────

#[test]
fn skip_dirs_and_lock_files_never_reach_the_converter() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let kept = touch(root, "docs/keep.docx");
    touch(root, ".git/hooks/secret.docx");
    touch(root, "md_out/previous.docx");
    touch(root, "docs/~$keep.docx");
    touch(root, "docs/notes.txt");
    let fake = ScriptedConverter::accepting(&["gfm-raw_html-fenced_divs-bracketed_spans"]);

    let report = convert_dir_with(&fake, root, None, &ConversionConfig::default()).unwrap();

    assert_eq!(report.documents.len(), 1);
    let inputs = fake.inputs();
    assert_eq!(inputs.len(), 1);
    assert_eq!(
        inputs[0].file_name(),
        kept.file_name(),
        "only docs/keep.docx is converted"
    );
    assert!(root.join("md_out/docs/keep.md").is_file());
}

#[test]
fn extra_skip_dir_from_config() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "drafts/wip.docx");
    touch(dir.path(), "final.docx");
    let config = ConversionConfig::builder().skip_dir("drafts").build().unwrap();
    let fake = ScriptedConverter::accepting(&["gfm"]);

    let report = convert_dir_with(&fake, dir.path(), None, &config).unwrap();

    let names: Vec<&str> = report.documents.iter().map(|d| d.relative.as_str()).collect();
    assert_eq!(names, ["final.docx"]);
}

// ── Run log ──────────────────────────────────────────────────────────────────

#[test]
fn run_log_has_header_warnings_and_result() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a/spec.docx");
    let out = dir.path().join("export");
    let mut fake = ScriptedConverter::accepting(&["markdown"]);
    fake.warnings = "[WARNING] Could not convert TeX math\n";

    let report =
        convert_dir_with(&fake, dir.path(), Some(&out), &ConversionConfig::default()).unwrap();

    let log_path = report.log_path.clone().unwrap();
    assert_eq!(log_path.file_name().unwrap(), "_convert_log.txt");
    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.starts_with(&format!("\n{}\nRUN ", "=".repeat(80))));
    assert!(log.contains("PANDOC: pandoc 3.1.9\n"));
    assert!(log.contains("FILES : 1\n"));
    assert!(log.contains("TO_CANDIDATES:\n  - gfm-raw_html-fenced_divs-bracketed_spans\n"));
    assert!(log.contains("  - plain\n"));
    assert!(log.contains("[WARN] a/spec.docx (markdown) :: [WARNING] Could not convert TeX math\n"));
    assert!(log.ends_with("RESULT: ok=1, fail=0\n"));

    match &report.documents[0].status {
        DocumentStatus::Converted { warnings, .. } => {
            assert_eq!(warnings, "[WARNING] Could not convert TeX math");
        }
        other => panic!("expected conversion, got {other:?}"),
    }
    assert!(out.join("a/spec.md").is_file());
}

#[test]
fn clean_conversion_writes_no_warn_line() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "quiet.docx");
    let fake = ScriptedConverter::accepting(&["gfm-raw_html-fenced_divs-bracketed_spans"]);

    let report = convert_dir_with(&fake, dir.path(), None, &ConversionConfig::default()).unwrap();

    let log = fs::read_to_string(report.log_path.unwrap()).unwrap();
    assert!(!log.contains("[WARN]"));
    assert!(!log.contains("[FAIL]"));
}

// ── Startup and empty runs ───────────────────────────────────────────────────

#[test]
fn missing_tool_aborts_before_any_document() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "report.docx");
    let mut fake = ScriptedConverter::accepting(&["gfm"]);
    fake.version = Err(());

    let err = convert_dir_with(&fake, dir.path(), None, &ConversionConfig::default()).unwrap_err();

    assert!(matches!(err, Docx2MdError::ToolNotFound { .. }));
    assert!(fake.calls.borrow().is_empty());
    assert!(!dir.path().join("md_out").exists());
}

#[test]
fn real_pandoc_lookup_reports_missing_binary() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConversionConfig::builder()
        .program("no-such-pandoc-binary-for-tests")
        .build()
        .unwrap();

    let err = convert_dir(dir.path(), None, &config).unwrap_err();
    assert!(matches!(err, Docx2MdError::ToolNotFound { .. }), "got: {err:?}");
}

#[test]
fn empty_input_writes_no_log() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "readme.txt");
    let fake = ScriptedConverter::accepting(&["gfm"]);

    let report = convert_dir_with(&fake, dir.path(), None, &ConversionConfig::default()).unwrap();

    assert!(report.documents.is_empty());
    assert!(report.log_path.is_none());
    assert!(!dir.path().join("md_out/_convert_log.txt").exists());
}

#[test]
fn missing_input_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let fake = ScriptedConverter::accepting(&["gfm"]);
    let err = convert_dir_with(
        &fake,
        dir.path().join("absent"),
        None,
        &ConversionConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Docx2MdError::InputNotFound { .. }));
}

// ── Progress callback ────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingCallback {
    events: Mutex<Vec<String>>,
}

impl ConversionProgressCallback for RecordingCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.events.lock().unwrap().push(format!("start {total_documents}"));
    }

    fn on_document_converted(&self, relative: &str, format: &str) {
        self.events.lock().unwrap().push(format!("ok {relative} {format}"));
    }

    fn on_document_failed(&self, relative: &str, _message: &str) {
        self.events.lock().unwrap().push(format!("fail {relative}"));
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("done {succeeded}/{failed}"));
    }
}

#[test]
fn progress_events_in_document_order() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "b.docx");
    touch(dir.path(), "a.docx");
    let recorder = Arc::new(RecordingCallback::default());
    let config = ConversionConfig::builder()
        .candidates(["gfm"])
        .progress_callback(recorder.clone())
        .build()
        .unwrap();
    let fake = ScriptedConverter::accepting(&["gfm"]);

    convert_dir_with(&fake, dir.path(), None, &config).unwrap();

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        ["start 2", "ok a.docx gfm", "ok b.docx gfm", "done 2/0"]
    );
}
