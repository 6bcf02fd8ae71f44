use std::path::PathBuf;
use thiserror::Error;

/// The main error type for yolo-curate operations.
#[derive(Debug, Error)]
pub enum CurateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed while traversing {}: {message}", path.display())]
    Traversal { path: PathBuf, message: String },

    #[error("Failed to read label file {}: {source}", path.display())]
    LabelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write label file {}: {source}", path.display())]
    LabelWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No (image, label) pairs found in {}", images_dir.display())]
    EmptyCorpus { images_dir: PathBuf },

    #[error("Invalid split parameters: {message}")]
    InvalidSplitParams { message: String },

    #[error("Failed to relocate {} to {}: {source}", from.display(), to.display())]
    RelocationFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Relocation incomplete: {} was copied to {} but could not be removed ({source}); the file now exists in both partitions",
        from.display(),
        copied_to.display()
    )]
    RelocationIncomplete {
        from: PathBuf,
        copied_to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Partial relocation: {} was relocated but {} was not ({source}); pair is now split across partitions",
        relocated.display(),
        failed.display()
    )]
    PartialRelocation {
        relocated: PathBuf,
        failed: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rename {} to {}: {source}", from.display(), to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Golden set verification failed: {message}")]
    VerificationFailed { message: String },

    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),
}
