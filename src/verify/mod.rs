//! Golden-set verification.
//!
//! A release gate for a frozen evaluation set: every accepted image must
//! decode and must have an exact-stem label file. The first failure stops the
//! pass. Label contents are not inspected, and nothing is written.

mod report;

pub use report::{VerifyFailure, VerifyReport};

use std::path::Path;

use image::ImageReader;

use crate::error::CurateError;
use crate::fs_util::{self, LABEL_EXTENSION};

/// Default location of the golden images, relative to the working directory.
pub const DEFAULT_GOLDEN_IMAGES_DIR: &str = "data/test/golden_test_set/images";
/// Default location of the golden labels, relative to the working directory.
pub const DEFAULT_GOLDEN_LABELS_DIR: &str = "data/test/golden_test_set/labels";

/// Verify the golden set in `images_dir` / `labels_dir`.
///
/// Missing directories and per-image problems are reported through
/// [`VerifyReport::failure`]; `Err` is reserved for traversal errors.
pub fn verify_golden_set(images_dir: &Path, labels_dir: &Path) -> Result<VerifyReport, CurateError> {
    let mut report = VerifyReport::default();

    for dir in [images_dir, labels_dir] {
        if !dir.is_dir() {
            report.failure = Some(VerifyFailure::MissingDirectory {
                path: dir.to_path_buf(),
            });
            return Ok(report);
        }
    }

    for image in fs_util::collect_images(images_dir)? {
        if let Err(message) = decode_image(&image) {
            report.failure = Some(VerifyFailure::UndecodableImage { image, message });
            return Ok(report);
        }

        let Some(stem) = image.file_stem() else {
            continue;
        };
        let mut label_name = stem.to_os_string();
        label_name.push(".");
        label_name.push(LABEL_EXTENSION);
        let expected = labels_dir.join(label_name);
        if !expected.is_file() {
            report.failure = Some(VerifyFailure::MissingLabel { image, expected });
            return Ok(report);
        }

        tracing::debug!(image = %image.display(), "golden image verified");
        report.images_checked += 1;
    }

    Ok(report)
}

fn decode_image(path: &Path) -> Result<(), String> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| err.to_string())?;
    reader.decode().map(|_| ()).map_err(|err| err.to_string())
}
