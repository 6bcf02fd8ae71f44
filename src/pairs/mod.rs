//! Image to label pairing.
//!
//! Each image in an images directory is resolved to a label file by trying an
//! ordered list of [`LabelMatcher`]s; the first candidate that exists on disk
//! wins. Resolution never touches storage and never fails because of a single
//! unmatched image: those are collected and handed back to the caller.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CurateError;
use crate::fs_util::{self, LABEL_EXTENSION};

/// A strategy that proposes a label path for an image stem.
pub trait LabelMatcher {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Candidate label path for `image_stem`, or `None` if the strategy does
    /// not apply to this stem.
    fn candidate(&self, labels_dir: &Path, image_stem: &str) -> Option<PathBuf>;
}

/// `<labels_dir>/<image_stem>.txt`
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactStem;

impl LabelMatcher for ExactStem {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn candidate(&self, labels_dir: &Path, image_stem: &str) -> Option<PathBuf> {
        Some(labels_dir.join(format!("{image_stem}.{LABEL_EXTENSION}")))
    }
}

/// `image_<id>.ext` paired with `<prefix><id>.txt`, where `<id>` is everything
/// after the first underscore of the image stem.
#[derive(Clone, Debug)]
pub struct PrefixFallback {
    pub label_prefix: String,
}

impl Default for PrefixFallback {
    fn default() -> Self {
        Self {
            label_prefix: "label_".to_string(),
        }
    }
}

impl LabelMatcher for PrefixFallback {
    fn name(&self) -> &'static str {
        "prefix-fallback"
    }

    fn candidate(&self, labels_dir: &Path, image_stem: &str) -> Option<PathBuf> {
        let (_, suffix) = image_stem.split_once('_')?;
        Some(labels_dir.join(format!("{}{suffix}.{LABEL_EXTENSION}", self.label_prefix)))
    }
}

/// The default matcher chain: exact stem, then `label_` prefix fallback.
pub fn default_matchers() -> Vec<Box<dyn LabelMatcher>> {
    vec![Box::new(ExactStem), Box::new(PrefixFallback::default())]
}

/// An image and the label file it resolved to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageLabelPair {
    pub image: PathBuf,
    pub label: PathBuf,
    /// Name of the matcher that produced the label path.
    pub matched_by: &'static str,
}

/// Outcome of resolving an images directory against a labels directory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PairResolution {
    pub pairs: Vec<ImageLabelPair>,
    pub unmatched: Vec<PathBuf>,
}

impl PairResolution {
    /// Pairs resolved by anything other than [`ExactStem`].
    pub fn fallback_matched(&self) -> impl Iterator<Item = &ImageLabelPair> {
        self.pairs
            .iter()
            .filter(|pair| pair.matched_by != ExactStem.name())
    }
}

/// Resolves images to labels with an ordered matcher chain.
pub struct PairResolver {
    matchers: Vec<Box<dyn LabelMatcher>>,
}

impl Default for PairResolver {
    fn default() -> Self {
        Self::new(default_matchers())
    }
}

impl PairResolver {
    pub fn new(matchers: Vec<Box<dyn LabelMatcher>>) -> Self {
        Self { matchers }
    }

    pub fn matchers(&self) -> &[Box<dyn LabelMatcher>] {
        &self.matchers
    }

    /// Resolve every candidate image directly inside `images_dir`.
    ///
    /// Images are visited in lexicographic order, so the result is a pure
    /// function of directory contents.
    pub fn resolve(
        &self,
        images_dir: &Path,
        labels_dir: &Path,
    ) -> Result<PairResolution, CurateError> {
        fs_util::require_dir(images_dir)?;
        fs_util::require_dir(labels_dir)?;

        let mut resolution = PairResolution::default();
        for image in fs_util::collect_images(images_dir)? {
            match self.match_image(&image, labels_dir) {
                Some((label, matched_by)) => {
                    resolution.pairs.push(ImageLabelPair {
                        image,
                        label,
                        matched_by,
                    });
                }
                None => {
                    tracing::debug!(image = %image.display(), "no label matched image");
                    resolution.unmatched.push(image);
                }
            }
        }

        Ok(resolution)
    }

    /// First existing label candidate for `image`, with the matcher name.
    pub fn match_image(&self, image: &Path, labels_dir: &Path) -> Option<(PathBuf, &'static str)> {
        let stem = image.file_stem()?.to_str()?;
        self.matchers.iter().find_map(|matcher| {
            matcher
                .candidate(labels_dir, stem)
                .filter(|candidate| candidate.is_file())
                .map(|candidate| (candidate, matcher.name()))
        })
    }
}

/// Resolve with the default matcher chain.
pub fn resolve_pairs(images_dir: &Path, labels_dir: &Path) -> Result<PairResolution, CurateError> {
    PairResolver::default().resolve(images_dir, labels_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, b"").expect("write file");
    }

    fn layout() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let temp = tempfile::tempdir().expect("create temp dir");
        let images = temp.path().join("images");
        let labels = temp.path().join("labels");
        fs::create_dir_all(&images).expect("create images dir");
        fs::create_dir_all(&labels).expect("create labels dir");
        (temp, images, labels)
    }

    #[test]
    fn exact_match_wins_over_fallback() {
        let (_temp, images, labels) = layout();
        touch(&images.join("image_001.jpg"));
        touch(&labels.join("image_001.txt"));
        touch(&labels.join("label_001.txt"));

        let resolution = resolve_pairs(&images, &labels).expect("resolve");

        assert_eq!(resolution.pairs.len(), 1);
        assert_eq!(resolution.pairs[0].label, labels.join("image_001.txt"));
        assert_eq!(resolution.pairs[0].matched_by, "exact");
        assert_eq!(resolution.fallback_matched().count(), 0);
    }

    #[test]
    fn falls_back_to_label_prefix() {
        let (_temp, images, labels) = layout();
        touch(&images.join("image_7_a.PNG"));
        touch(&labels.join("label_7_a.txt"));

        let resolution = resolve_pairs(&images, &labels).expect("resolve");

        assert_eq!(resolution.pairs.len(), 1);
        assert_eq!(resolution.pairs[0].label, labels.join("label_7_a.txt"));
        assert_eq!(resolution.fallback_matched().count(), 1);
    }

    #[test]
    fn stems_without_underscore_have_no_fallback() {
        let (_temp, images, labels) = layout();
        touch(&images.join("photo.jpg"));
        touch(&labels.join("label_photo.txt"));

        let resolution = resolve_pairs(&images, &labels).expect("resolve");

        assert!(resolution.pairs.is_empty());
        assert_eq!(resolution.unmatched, vec![images.join("photo.jpg")]);
    }

    #[test]
    fn skips_non_images_and_directories() {
        let (_temp, images, labels) = layout();
        touch(&images.join("readme.md"));
        fs::create_dir_all(images.join("sub.jpg")).expect("create dir");
        touch(&images.join("b.webp"));
        touch(&images.join("a.bmp"));
        touch(&labels.join("a.txt"));

        let resolution = resolve_pairs(&images, &labels).expect("resolve");

        assert_eq!(resolution.pairs.len(), 1);
        assert_eq!(resolution.pairs[0].image, images.join("a.bmp"));
        assert_eq!(resolution.unmatched, vec![images.join("b.webp")]);
    }

    #[test]
    fn resolution_is_repeatable() {
        let (_temp, images, labels) = layout();
        for i in 0..5 {
            touch(&images.join(format!("image_{i}.jpg")));
            if i % 2 == 0 {
                touch(&labels.join(format!("image_{i}.txt")));
            } else if i == 3 {
                touch(&labels.join(format!("label_{i}.txt")));
            }
        }

        let first = resolve_pairs(&images, &labels).expect("first resolve");
        let second = resolve_pairs(&images, &labels).expect("second resolve");

        assert_eq!(first, second);
        assert_eq!(first.pairs.len(), 4);
        assert_eq!(first.unmatched, vec![images.join("image_1.jpg")]);
    }

    #[test]
    fn missing_directories_fail() {
        let (temp, images, _labels) = layout();
        let err = resolve_pairs(&images, &temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, CurateError::DirectoryNotFound { .. }));
    }

    #[test]
    fn custom_matchers_extend_the_chain() {
        struct Lowercase;
        impl LabelMatcher for Lowercase {
            fn name(&self) -> &'static str {
                "lowercase"
            }
            fn candidate(&self, labels_dir: &Path, image_stem: &str) -> Option<PathBuf> {
                Some(labels_dir.join(format!("{}.txt", image_stem.to_lowercase())))
            }
        }

        let (_temp, images, labels) = layout();
        touch(&images.join("IMG.jpg"));
        touch(&labels.join("img.txt"));

        let mut matchers = default_matchers();
        matchers.push(Box::new(Lowercase));
        let resolution = PairResolver::new(matchers)
            .resolve(&images, &labels)
            .expect("resolve");

        assert_eq!(resolution.pairs.len(), 1);
        assert_eq!(resolution.pairs[0].matched_by, "lowercase");
    }
}
