//! Pipeline stages for DOCX-to-Markdown batch conversion.
//!
//! Each submodule implements one step, so each is testable on its own and
//! the converter can be swapped for a fake.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ layout ──▶ driver ──▶ converter ──▶ normalize
//! (walk+filter) (paths)  (fallback)  (pandoc)     (cleanup)
//! ```
//!
//! 1. [`discover`]  — walk the input root, apply the skip set and lock-file
//!    filter, sort
//! 2. [`layout`]    — map a document to its `.md` path and media directory
//! 3. [`driver`]    — try candidate writers in order, stop at the first success
//! 4. [`converter`] — the [`converter::ExternalConverter`] seam and the
//!    `pandoc` implementation; the only stage that spawns processes
//! 5. [`normalize`] — deterministic cleanup rules (fenced divs, attribute
//!    groups, raw tags, blank runs)

pub mod converter;
pub mod discover;
pub mod driver;
pub mod layout;
pub mod normalize;
