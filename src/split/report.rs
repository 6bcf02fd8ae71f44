//! Split report types.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::SplitMode;
use crate::fs_util::display_name;
use crate::pairs::ImageLabelPair;

/// Pair counts recomputed from storage after a real split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PartitionCounts {
    pub train_pairs: usize,
    pub val_pairs: usize,
}

/// Outcome of a train/val split.
#[derive(Clone, Debug, Serialize)]
pub struct SplitReport {
    pub mode: SplitMode,
    pub dry_run: bool,
    pub val_ratio: f64,
    /// Pairs found in the train tree before relocation.
    pub pairs_found: usize,
    /// Train images with no resolvable label.
    pub unmatched: Vec<PathBuf>,
    /// Pairs selected for relocation, in selection order.
    pub selected: Vec<ImageLabelPair>,
    /// Storage recount; absent on dry runs.
    pub after: Option<PartitionCounts>,
}

impl SplitReport {
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for image in &self.unmatched {
            writeln!(f, "[warn] Missing label for image: {}", display_name(image))?;
        }
        writeln!(
            f,
            "[info] Found {} pairs in train. {} {} pairs to val ({:.1}%).",
            self.pairs_found,
            self.mode,
            self.selected_count(),
            self.val_ratio * 100.0
        )?;

        if self.dry_run {
            for pair in &self.selected {
                writeln!(f, "[dry-run] {} {}", self.mode, display_name(&pair.image))?;
            }
        }

        if let Some(after) = self.after {
            writeln!(
                f,
                "[done] Train pairs: {} | Val pairs: {}",
                after.train_pairs, after.val_pairs
            )?;
        }

        Ok(())
    }
}
