//! Input discovery: find the documents a batch will convert.
//!
//! Walks the input root recursively (symlinks are not followed) and keeps
//! regular files with the configured extension, except:
//!
//! - anything below a directory whose name is in the skip set (`.git`,
//!   `md_out`, ...), checked on path components *relative to the root*, so
//!   an input root that itself lives inside `.git` still works;
//! - office lock files, whose names start with `~$`.
//!
//! The result is sorted so runs are reproducible.

use crate::config::ConversionConfig;
use crate::error::Docx2MdError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// `true` if a path relative to the input root must never be converted.
pub fn is_excluded(relative: &Path, config: &ConversionConfig) -> bool {
    let in_skipped_dir = relative.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|name| config.skip_dirs.contains(name))
    });
    in_skipped_dir || is_lock_file(relative, config)
}

fn is_lock_file(path: &Path, config: &ConversionConfig) -> bool {
    !config.lock_prefix.is_empty()
        && path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with(&config.lock_prefix))
            .unwrap_or(false)
}

fn has_input_extension(path: &Path, config: &ConversionConfig) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(&config.input_extension))
}

/// Collect every eligible document under `input_root`, sorted by path.
pub fn discover(input_root: &Path, config: &ConversionConfig) -> Result<Vec<PathBuf>, Docx2MdError> {
    if !input_root.is_dir() {
        return Err(Docx2MdError::InputNotFound {
            path: input_root.to_path_buf(),
        });
    }

    let mut documents = Vec::new();
    let walker = WalkDir::new(input_root).into_iter().filter_entry(|e| {
        e.depth() == 0
            || !e.file_type().is_dir()
            || !e
                .file_name()
                .to_str()
                .is_some_and(|name| config.skip_dirs.contains(name))
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(Docx2MdError::Discovery {
                    path: input_root.to_path_buf(),
                    detail: e.to_string(),
                });
            }
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_input_extension(entry.path(), config) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(input_root) else {
            continue;
        };
        if is_excluded(relative, config) {
            debug!(path = %relative.display(), "Excluded from batch");
            continue;
        }
        documents.push(entry.into_path());
    }

    documents.sort();
    Ok(documents)
}
