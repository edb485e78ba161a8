//! Normalization: deterministic cleanup of pandoc-generated Markdown.
//!
//! Even with the most restrictive writer pandoc accepts, DOCX conversions
//! leave residue that reads badly as plain Markdown:
//!
//! - `:::` fenced-div delimiters around custom-styled paragraphs
//! - `{.underline}` / `{#ref .class}` attribute groups after spans and headings
//! - raw `<span>`, `<u>`, `<br />` tags when a fallback writer keeps raw HTML
//! - long runs of blank lines where pandoc dropped empty containers
//!
//! [`clean_markdown`] removes them with a fixed sequence of regex rules. The
//! pass is pure and idempotent: feeding its output back in returns the same
//! text.
//!
//! ## Limitation
//!
//! Tag stripping is lexical. `<T>` inside a fenced code block is removed just
//! like a stray HTML tag; there is no region awareness.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply every normalization rule to raw converter output.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF / CR → LF)
/// 2. Per line: drop fenced-div delimiter lines, strip a trailing `{...}`
///    attribute group, strip tag-like tokens. Repeated until the line stops
///    changing, since removing one token can expose another.
/// 3. Trim trailing whitespace per line
/// 4. Collapse 3+ consecutive newlines down to 2
/// 5. Turn whitespace-only lines into empty lines
/// 6. Trim the whole text and end it with exactly one newline
pub fn clean_markdown(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = clean_lines(&s);
    let s = collapse_blank_lines(&s);
    let s = blank_whitespace_lines(&s);
    ensure_final_newline(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Line-level markup stripping ──────────────────────────────────────

fn clean_lines(input: &str) -> String {
    input
        .lines()
        .filter_map(clean_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns `None` when the line is a fenced-div delimiter and must be dropped.
fn clean_line(line: &str) -> Option<String> {
    let mut current = line.to_string();
    loop {
        if is_fenced_div_line(&current) {
            return None;
        }
        let next = strip_raw_tags(&strip_trailing_attributes(&current));
        if next == current {
            return Some(trim_trailing_whitespace(&next).to_string());
        }
        current = next;
    }
}

// `:::`, `::::: {.warning}` and friends. Dropped, not blanked.
static RE_FENCED_DIV_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*:::+\s*(\{.*\})?\s*$").unwrap());

fn is_fenced_div_line(line: &str) -> bool {
    RE_FENCED_DIV_LINE.is_match(line)
}

static RE_TRAILING_ATTRIBUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\{[^}]*\}\s*$").unwrap());

fn strip_trailing_attributes(line: &str) -> String {
    RE_TRAILING_ATTRIBUTES.replace_all(line, "").into_owned()
}

static RE_RAW_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?([A-Za-z][A-Za-z0-9]*)\b[^>]*>").unwrap());

fn strip_raw_tags(line: &str) -> String {
    RE_RAW_TAG.replace_all(line, "").into_owned()
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(line: &str) -> &str {
    line.trim_end()
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").into_owned()
}

// ── Rule 5: Whitespace-only lines become empty ───────────────────────────────

fn blank_whitespace_lines(input: &str) -> String {
    input
        .lines()
        .map(|line| if line.trim().is_empty() { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 6: Trim and end with a single newline ───────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    format!("{}\n", input.trim())
}

// ── Tests ────────────────────────────────────────────────────────────────────
