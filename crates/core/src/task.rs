//! Per-image work unit.

use std::path::{Path, PathBuf};

/// One input image plus its derived artifacts and sequence index.
///
/// Created once per input path at dispatch time, owned exclusively by
/// its worker, and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    /// Original image path as given on the command line.
    pub source: PathBuf,
    /// 1-based position among the inputs; drives all ordering.
    pub index: u64,
    /// Output path of the thumbnail (`thumb_<basename>`).
    pub thumbnail: PathBuf,
    /// Output path of the medium-size image (`med_<basename>`).
    pub medium: PathBuf,
}

impl ImageTask {
    /// Builds a task for the image at `index` (1-based), placing the
    /// derived files in `output_dir`.
    pub fn new(source: PathBuf, index: u64, output_dir: &Path) -> Self {
        let basename = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("image_{index}"));

        let thumbnail = output_dir.join(format!("thumb_{basename}"));
        let medium = output_dir.join(format!("med_{basename}"));

        Self {
            source,
            index,
            thumbnail,
            medium,
        }
    }

    /// File name of the thumbnail, as referenced from the page.
    pub fn thumbnail_name(&self) -> String {
        self.thumbnail
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// File name of the medium-size image, as referenced from the page.
    pub fn medium_name(&self) -> String {
        self.medium
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_names() {
        let task = ImageTask::new(PathBuf::from("shots/photo.jpg"), 1, Path::new("."));
        assert_eq!(task.thumbnail, PathBuf::from("./thumb_photo.jpg"));
        assert_eq!(task.medium, PathBuf::from("./med_photo.jpg"));
        assert_eq!(task.thumbnail_name(), "thumb_photo.jpg");
        assert_eq!(task.medium_name(), "med_photo.jpg");
    }

    #[test]
    fn test_basename_strips_directories() {
        let task = ImageTask::new(PathBuf::from("/a/b/c/pic.png"), 3, Path::new("/out"));
        assert_eq!(task.thumbnail, PathBuf::from("/out/thumb_pic.png"));
        assert_eq!(task.index, 3);
    }
}
