//! Running counters for a label-fixing pass.

use serde::Serialize;
use std::fmt;
use std::ops::AddAssign;

/// Aggregate statistics for one or more label files.
///
/// Each call to [`super::process_label_file`] returns the delta for a single
/// file; the directory pass folds those into a running total with `+=`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FixStats {
    pub files_seen: usize,
    /// Files in which at least one class id was remapped.
    pub files_modified: usize,
    pub lines_seen: usize,
    pub lines_kept: usize,
    pub class_changes: usize,
    pub malformed_lines: usize,
}

impl AddAssign for FixStats {
    fn add_assign(&mut self, rhs: Self) {
        self.files_seen += rhs.files_seen;
        self.files_modified += rhs.files_modified;
        self.lines_seen += rhs.lines_seen;
        self.lines_kept += rhs.lines_kept;
        self.class_changes += rhs.class_changes;
        self.malformed_lines += rhs.malformed_lines;
    }
}

/// Summary of a label-fixing run, tagged with its mode.
#[derive(Clone, Debug, Serialize)]
pub struct FixReport {
    pub dry_run: bool,
    #[serde(flatten)]
    pub stats: FixStats,
}

impl FixReport {
    pub fn mode_tag(&self) -> &'static str {
        if self.dry_run {
            "DRY-RUN"
        } else {
            "APPLY"
        }
    }
}

impl fmt::Display for FixReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(
            f,
            "[{}] files_seen={} files_modified={} lines_seen={} lines_kept={} class_changes={} malformed_lines={}",
            self.mode_tag(),
            s.files_seen,
            s.files_modified,
            s.lines_seen,
            s.lines_kept,
            s.class_changes,
            s.malformed_lines
        )
    }
}
