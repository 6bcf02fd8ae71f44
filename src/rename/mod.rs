//! Label renaming.
//!
//! Makes fallback-matched labels exact: every label that only resolves through
//! a non-canonical matcher is renamed to `<image_stem>.txt`, so later runs pair
//! it directly. Existing canonical labels are never overwritten, and a label
//! that is already the exact-stem label of another image is never taken.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CurateError;
use crate::fs_util::{self, display_name, LABEL_EXTENSION};
use crate::pairs::{ExactStem, LabelMatcher, PairResolver};

/// Options for a renaming pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenameOptions {
    pub dry_run: bool,
}

/// One planned or performed rename.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenameAction {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Something the renamer did or could not do for one image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RenameEvent {
    Renamed(RenameAction),
    /// The image has neither a canonical nor a usable fallback label.
    Unmatched { image: PathBuf },
}

/// Outcome of a renaming pass. Events are in image order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RenameReport {
    pub dry_run: bool,
    pub events: Vec<RenameEvent>,
}

impl RenameReport {
    pub fn actions(&self) -> impl Iterator<Item = &RenameAction> {
        self.events.iter().filter_map(|event| match event {
            RenameEvent::Renamed(action) => Some(action),
            RenameEvent::Unmatched { .. } => None,
        })
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &Path> {
        self.events.iter().filter_map(|event| match event {
            RenameEvent::Unmatched { image } => Some(image.as_path()),
            RenameEvent::Renamed(_) => None,
        })
    }

    pub fn renamed(&self) -> usize {
        self.actions().count()
    }
}

impl fmt::Display for RenameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            match event {
                RenameEvent::Renamed(action) => writeln!(
                    f,
                    "[fix] {} -> {}",
                    display_name(&action.from),
                    display_name(&action.to)
                )?,
                RenameEvent::Unmatched { image } => {
                    writeln!(f, "[warn] No label found for image: {}", display_name(image))?
                }
            }
        }
        writeln!(
            f,
            "[done] Renamed {} label files to match image stems.",
            self.renamed()
        )
    }
}

/// Rename fallback-matched labels in `labels_dir` to their image's stem.
pub fn rename_labels(
    images_dir: &Path,
    labels_dir: &Path,
    opts: &RenameOptions,
) -> Result<RenameReport, CurateError> {
    fs_util::require_dir(images_dir)?;
    fs_util::require_dir(labels_dir)?;

    let images = fs_util::collect_images(images_dir)?;
    // A fallback name that is some image's own stem belongs to that image.
    let image_stems: HashSet<&str> = images
        .iter()
        .filter_map(|image| image.file_stem().and_then(|s| s.to_str()))
        .collect();

    let resolver = PairResolver::default();
    let mut report = RenameReport {
        dry_run: opts.dry_run,
        ..Default::default()
    };
    // In dry-run nothing moves, so track sources already spoken for.
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for image in &images {
        let Some(stem) = image.file_stem().and_then(|s| s.to_str()) else {
            report.events.push(RenameEvent::Unmatched {
                image: image.clone(),
            });
            continue;
        };
        let target = labels_dir.join(format!("{stem}.{LABEL_EXTENSION}"));
        if target.is_file() || claimed.contains(&target) {
            continue;
        }

        let source = resolver
            .matchers()
            .iter()
            .filter(|matcher| matcher.name() != ExactStem.name())
            .filter_map(|matcher| matcher.candidate(labels_dir, stem))
            .find(|candidate| {
                candidate.is_file()
                    && !claimed.contains(candidate)
                    && !is_exact_label_of_image(candidate, &image_stems)
            });

        let Some(source) = source else {
            report.events.push(RenameEvent::Unmatched {
                image: image.clone(),
            });
            continue;
        };

        tracing::debug!(from = %source.display(), to = %target.display(), "renaming label");
        if !opts.dry_run {
            fs::rename(&source, &target).map_err(|err| CurateError::RenameFailed {
                from: source.clone(),
                to: target.clone(),
                source: err,
            })?;
        }
        claimed.insert(source.clone());
        claimed.insert(target.clone());
        report.events.push(RenameEvent::Renamed(RenameAction {
            from: source,
            to: target,
        }));
    }

    Ok(report)
}

fn is_exact_label_of_image(candidate: &Path, image_stems: &HashSet<&str>) -> bool {
    candidate
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| image_stems.contains(stem))
}
