//! Deterministic directory listing shared by every pipeline stage.
//!
//! All traversal goes through [`WalkDir`] with entries sorted by file name, so
//! listings come back in lexicographic path order regardless of how the
//! underlying filesystem enumerates them.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::CurateError;

/// Image extensions accepted by the pair resolver and the golden-set verifier.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// Extension of label files.
pub const LABEL_EXTENSION: &str = "txt";

/// How deep a listing descends below its root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Depth {
    /// Direct children of the root only.
    Flat,
    /// The whole tree below the root.
    Recursive,
}

/// Fail with [`CurateError::DirectoryNotFound`] unless `path` is a directory.
pub fn require_dir(path: &Path) -> Result<(), CurateError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CurateError::DirectoryNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// List regular files under `root` whose extension (case-insensitive) is in
/// `extensions`, in lexicographic path order.
pub fn collect_files_with_extensions(
    root: &Path,
    extensions: &[&str],
    depth: Depth,
) -> Result<Vec<PathBuf>, CurateError> {
    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    if depth == Depth::Flat {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| CurateError::Traversal {
            path: root.to_path_buf(),
            message: source.to_string(),
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// List candidate image files directly inside `dir`.
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>, CurateError> {
    collect_files_with_extensions(dir, &IMAGE_EXTENSIONS, Depth::Flat)
}

pub fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

/// File name for display, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
