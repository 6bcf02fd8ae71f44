//! Deterministic train/val splitting.
//!
//! Resolves every (image, label) pair in the train tree, shuffles the pair list
//! with a seeded RNG and relocates the first `k` pairs into the val tree, where
//! `k = max(1, floor(n * ratio))`. The pair is the unit of relocation: the
//! image goes first, and a failure on its label aborts the run with
//! [`CurateError::PartialRelocation`] instead of continuing. A cross-device
//! move that copied a file but could not remove the source stops with
//! [`CurateError::RelocationIncomplete`].

mod report;

pub use report::{PartitionCounts, SplitReport};

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::error::CurateError;
use crate::pairs::{resolve_pairs, ImageLabelPair};

/// Whether selected pairs leave the train tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Non-destructive; a pair may then exist in both partitions.
    Copy,
    /// Destructive; each pair belongs to exactly one partition.
    #[default]
    Move,
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitMode::Copy => write!(f, "COPY"),
            SplitMode::Move => write!(f, "MOVE"),
        }
    }
}

/// The four directories a split reads from and writes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitLayout {
    pub train_images: PathBuf,
    pub train_labels: PathBuf,
    pub val_images: PathBuf,
    pub val_labels: PathBuf,
}

impl SplitLayout {
    /// `<root>/<train>/<images>` and friends.
    pub fn from_root(
        root: &Path,
        train_subdir: &str,
        val_subdir: &str,
        images_subdir: &str,
        labels_subdir: &str,
    ) -> Self {
        Self {
            train_images: root.join(train_subdir).join(images_subdir),
            train_labels: root.join(train_subdir).join(labels_subdir),
            val_images: root.join(val_subdir).join(images_subdir),
            val_labels: root.join(val_subdir).join(labels_subdir),
        }
    }
}

/// Split options.
#[derive(Clone, Copy, Debug)]
pub struct SplitOptions {
    /// Fraction of pairs to relocate, in `(0, 1]`.
    pub val_ratio: f64,
    pub seed: u64,
    pub mode: SplitMode,
    pub dry_run: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            val_ratio: 0.1,
            seed: 42,
            mode: SplitMode::Move,
            dry_run: false,
        }
    }
}

/// Validate split options before touching storage.
pub fn validate_split_options(opts: &SplitOptions) -> Result<(), CurateError> {
    if !(opts.val_ratio.is_finite() && 0.0 < opts.val_ratio && opts.val_ratio <= 1.0) {
        return Err(CurateError::InvalidSplitParams {
            message: format!(
                "--val-ratio must be in the interval (0.0, 1.0], got {}; \
                 0 and values above 1 are refused rather than rounded to one pair or to every pair",
                opts.val_ratio
            ),
        });
    }
    Ok(())
}

/// Number of pairs to relocate: `max(1, floor(total * ratio))`, capped at `total`.
pub fn sample_count(total: usize, ratio: f64) -> usize {
    if total == 0 {
        return 0;
    }
    let raw = (total as f64 * ratio).floor() as usize;
    raw.clamp(1, total)
}

/// Shuffle `pairs` under `seed` and keep the first `k`.
///
/// Identical input order and seed always give the identical selection.
pub fn select_pairs(mut pairs: Vec<ImageLabelPair>, k: usize, seed: u64) -> Vec<ImageLabelPair> {
    let mut rng = StdRng::seed_from_u64(seed);
    pairs.shuffle(&mut rng);
    pairs.truncate(k);
    pairs
}

/// Split the train tree of `layout` into its val tree.
pub fn split_dataset(layout: &SplitLayout, opts: &SplitOptions) -> Result<SplitReport, CurateError> {
    validate_split_options(opts)?;

    if !opts.dry_run {
        fs::create_dir_all(&layout.val_images)?;
        fs::create_dir_all(&layout.val_labels)?;
    }

    let resolution = resolve_pairs(&layout.train_images, &layout.train_labels)?;
    let pairs_found = resolution.pairs.len();
    if pairs_found == 0 {
        return Err(CurateError::EmptyCorpus {
            images_dir: layout.train_images.clone(),
        });
    }

    let k = sample_count(pairs_found, opts.val_ratio);
    let selected = select_pairs(resolution.pairs, k, opts.seed);
    tracing::debug!(pairs_found, k, seed = opts.seed, "selected validation pairs");

    let mut report = SplitReport {
        mode: opts.mode,
        dry_run: opts.dry_run,
        val_ratio: opts.val_ratio,
        pairs_found,
        unmatched: resolution.unmatched,
        selected,
        after: None,
    };

    if opts.dry_run {
        return Ok(report);
    }

    for pair in &report.selected {
        relocate_pair(pair, layout, opts.mode)?;
    }

    let train_pairs = resolve_pairs(&layout.train_images, &layout.train_labels)?
        .pairs
        .len();
    let val_pairs = resolve_pairs(&layout.val_images, &layout.val_labels)?
        .pairs
        .len();
    report.after = Some(PartitionCounts {
        train_pairs,
        val_pairs,
    });

    Ok(report)
}

/// Relocate both halves of a pair into the val tree, image first.
pub fn relocate_pair(
    pair: &ImageLabelPair,
    layout: &SplitLayout,
    mode: SplitMode,
) -> Result<(), CurateError> {
    let image_dst = destination(&layout.val_images, &pair.image)?;
    let label_dst = destination(&layout.val_labels, &pair.label)?;

    relocate_file(&pair.image, &image_dst, mode)
        .map_err(|failure| relocation_error(&pair.image, &image_dst, failure))?;

    match relocate_file(&pair.label, &label_dst, mode) {
        Ok(()) => {}
        Err(RelocateFailure::NotMoved(source)) => {
            tracing::warn!(
                image = %image_dst.display(),
                label = %pair.label.display(),
                "label relocation failed after image was relocated"
            );
            return Err(CurateError::PartialRelocation {
                relocated: image_dst,
                failed: pair.label.clone(),
                source,
            });
        }
        Err(failure) => return Err(relocation_error(&pair.label, &label_dst, failure)),
    }

    tracing::debug!(
        image = %pair.image.display(),
        label = %pair.label.display(),
        %mode,
        "relocated pair"
    );
    Ok(())
}

fn destination(dir: &Path, src: &Path) -> Result<PathBuf, CurateError> {
    let name = src.file_name().ok_or_else(|| CurateError::RelocationFailed {
        from: src.to_path_buf(),
        to: dir.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
    })?;
    Ok(dir.join(name))
}

/// How far a single-file relocation got before it failed.
#[derive(Debug)]
enum RelocateFailure {
    /// Storage is as it was before the attempt.
    NotMoved(io::Error),
    /// The destination was written but the source could not be removed.
    SourceKept(io::Error),
}

fn relocation_error(from: &Path, to: &Path, failure: RelocateFailure) -> CurateError {
    match failure {
        RelocateFailure::NotMoved(source) => CurateError::RelocationFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        },
        RelocateFailure::SourceKept(source) => {
            tracing::warn!(
                from = %from.display(),
                copied_to = %to.display(),
                "file copied to val but not removed from train"
            );
            CurateError::RelocationIncomplete {
                from: from.to_path_buf(),
                copied_to: to.to_path_buf(),
                source,
            }
        }
    }
}

fn relocate_file(src: &Path, dst: &Path, mode: SplitMode) -> Result<(), RelocateFailure> {
    match mode {
        SplitMode::Copy => fs::copy(src, dst)
            .map(|_| ())
            .map_err(RelocateFailure::NotMoved),
        SplitMode::Move => match fs::rename(src, dst) {
            Ok(()) => Ok(()),
            // rename cannot cross filesystems; fall back to copy + remove.
            Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
                if let Err(copy_err) = fs::copy(src, dst) {
                    let _ = fs::remove_file(dst);
                    return Err(RelocateFailure::NotMoved(copy_err));
                }
                fs::remove_file(src).map_err(RelocateFailure::SourceKept)
            }
            Err(err) => Err(RelocateFailure::NotMoved(err)),
        },
    }
}
