//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the batch processes each document. The library itself never
//! prints; the `docx2md` binary renders these events as a progress bar plus
//! one `[OK]` / `[FAIL]` line per document.
//!
//! # Example
//!
//! ```rust
//! use docx_batch2md::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     converted: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_document_converted(&self, relative: &str, format: &str) {
//!         self.converted.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{relative} -> {format}");
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { converted: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the batch as it processes each document.
///
/// Documents are processed one at a time, so calls never overlap, but the
/// trait is still `Send + Sync` so a callback can be shared with other
/// threads of the host application. All methods default to no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the converter has been probed and both roots resolved,
    /// before discovery.
    fn on_run_start(&self, tool_version: &str, input_root: &Path, output_root: &Path) {
        let _ = (tool_version, input_root, output_root);
    }

    /// Called once after discovery, before the first document. Not called
    /// when nothing was found.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called before the first candidate is tried for a document.
    ///
    /// `index` is 1-based.
    fn on_document_start(&self, index: usize, total_documents: usize, relative: &str) {
        let _ = (index, total_documents, relative);
    }

    /// Called when a candidate format succeeded for a document.
    fn on_document_converted(&self, relative: &str, format: &str) {
        let _ = (relative, format);
    }

    /// Called when every candidate failed, or an I/O error stopped the document.
    fn on_document_failed(&self, relative: &str, message: &str) {
        let _ = (relative, message);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, succeeded: usize, failed: usize) {
        let _ = (succeeded, failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
#[derive(Debug, Default)]
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start("pandoc 3.1.9", Path::new("/in"), Path::new("/in/md_out"));
        cb.on_batch_start(2);
        cb.on_document_start(1, 2, "a.docx");
        cb.on_document_converted("a.docx", "gfm");
        cb.on_document_failed("b.docx", "boom");
        cb.on_batch_complete(1, 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_document_converted("x.docx", "markdown");
    }
}
