//! Golden-set verification report.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The first problem that stopped verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerifyFailure {
    /// The images or labels directory does not exist.
    MissingDirectory { path: PathBuf },
    /// An image could not be decoded.
    UndecodableImage { image: PathBuf, message: String },
    /// An image has no exact-stem label file.
    MissingLabel { image: PathBuf, expected: PathBuf },
}

impl fmt::Display for VerifyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyFailure::MissingDirectory { path } => {
                write!(f, "Directory does not exist: {}", path.display())
            }
            VerifyFailure::UndecodableImage { image, message } => {
                write!(f, "Image {} is not valid: {}", image.display(), message)
            }
            VerifyFailure::MissingLabel { image, expected } => write!(
                f,
                "Label file for {} does not exist (expected {})",
                image.display(),
                expected.display()
            ),
        }
    }
}

/// Result of verifying a golden set.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VerifyReport {
    /// Images that fully passed before verification stopped.
    pub images_checked: usize,
    pub failure: Option<VerifyFailure>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => writeln!(
                f,
                "All images and labels are valid ({} image(s) checked).",
                self.images_checked
            ),
            Some(failure) => {
                writeln!(f, "{failure}")?;
                writeln!(
                    f,
                    "Verification failed after {} valid image(s).",
                    self.images_checked
                )
            }
        }
    }
}
