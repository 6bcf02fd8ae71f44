//! Label file rewriting.
//!
//! Applies [`crate::label::normalize_line`] to every line of every `.txt` file
//! under a labels tree. A file counts as modified only when a class id was
//! remapped; clamping alone does not flip the flag and does not trigger a
//! rewrite. A file whose lines were all malformed is truncated to empty, which
//! turns it into a valid background label.

mod report;

pub use report::{FixReport, FixStats};

use std::fs;
use std::path::Path;

use crate::error::CurateError;
use crate::fs_util::{self, Depth, LABEL_EXTENSION};
use crate::label::normalize_line;

/// Options for a label-fixing pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixOptions {
    /// Parse and count, but never write.
    pub dry_run: bool,
}

/// Normalize every label file under `labels_dir`, in lexicographic path order.
pub fn fix_labels_dir(labels_dir: &Path, opts: &FixOptions) -> Result<FixReport, CurateError> {
    fs_util::require_dir(labels_dir)?;

    let files =
        fs_util::collect_files_with_extensions(labels_dir, &[LABEL_EXTENSION], Depth::Recursive)?;

    let mut stats = FixStats::default();
    for path in files {
        stats += process_label_file(&path, opts.dry_run)?;
    }

    Ok(FixReport {
        dry_run: opts.dry_run,
        stats,
    })
}

/// Normalize a single label file and return its statistics delta.
pub fn process_label_file(path: &Path, dry_run: bool) -> Result<FixStats, CurateError> {
    let mut stats = FixStats {
        files_seen: 1,
        ..Default::default()
    };

    let content = fs::read_to_string(path).map_err(|source| CurateError::LabelRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = content.trim();
    if text.is_empty() {
        return Ok(stats);
    }

    let mut kept = Vec::new();
    for (line_idx, line) in split_lines(text).enumerate() {
        stats.lines_seen += 1;
        match normalize_line(line) {
            Ok(normalized) => {
                if normalized.class_changed {
                    stats.class_changes += 1;
                }
                kept.push(normalized.record.to_string());
                stats.lines_kept += 1;
            }
            Err(reason) => {
                tracing::debug!(
                    path = %path.display(),
                    line = line_idx + 1,
                    %reason,
                    "dropping malformed label line"
                );
                stats.malformed_lines += 1;
            }
        }
    }

    let modified = stats.class_changes > 0;
    if modified {
        stats.files_modified = 1;
    }

    let all_dropped = kept.is_empty();
    if (modified || all_dropped) && !dry_run {
        let output = if all_dropped {
            String::new()
        } else {
            let mut joined = kept.join("\n");
            joined.push('\n');
            joined
        };
        fs::write(path, output).map_err(|source| CurateError::LabelWrite {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), lines = kept.len(), "rewrote label file");
    }

    Ok(stats)
}

/// Split on `\n`, `\r\n` and bare `\r`, the way older annotation tools end lines.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').flat_map(|piece| {
        piece
            .strip_suffix('\r')
            .unwrap_or(piece)
            .split('\r')
    })
}
