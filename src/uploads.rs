//! Image upload storage.
//!
//! Each entity category writes into its own subdirectory under the uploads
//! root. Stored names are `{uuid}{ext}` so two uploads of the same original
//! filename never collide, concurrent or not. Replacement call-sites write
//! the new file, update the owning row, then delete the old file.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to write upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("File must be an image")]
    NotAnImage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategory {
    Doctor,
    Schedule,
    Gallery,
}

impl ImageCategory {
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Doctor => "doctor_images",
            Self::Schedule => "schedule_images",
            Self::Gallery => "gallery",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the category subdirectories. Called once at startup.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for category in [ImageCategory::Doctor, ImageCategory::Schedule, ImageCategory::Gallery] {
            std::fs::create_dir_all(self.root.join(category.dir_name()))?;
        }
        Ok(())
    }

    /// Write the bytes under a fresh collision-free name, preserving the
    /// original extension. Returns the stored filename.
    pub fn save(
        &self,
        category: ImageCategory,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        let filename = format!("{}{}", Uuid::new_v4(), file_extension(original_name));
        let path = self.path_of(category, &filename);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)?;
        tracing::debug!(category = category.dir_name(), %filename, size = bytes.len(), "Stored upload");
        Ok(filename)
    }

    pub fn path_of(&self, category: ImageCategory, filename: &str) -> PathBuf {
        self.root.join(category.dir_name()).join(filename)
    }

    /// Best-effort removal of a stored file. Failure is logged, never fatal:
    /// the row is already gone or repointed by the time this runs.
    pub fn remove(&self, category: ImageCategory, filename: &str) {
        let path = self.path_of(category, filename);
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove stored image");
            }
        }
    }

    /// Public URL path for a stored file, as mounted under `/uploads`.
    pub fn public_url(category: ImageCategory, filename: &str) -> String {
        format!("/uploads/{}/{}", category.dir_name(), filename)
    }
}

/// Extension of the original filename including the dot, lowercased.
/// Empty when there is none; never trusted for anything but the suffix.
fn file_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ImageStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path());
        store.ensure_dirs().unwrap();
        (tmp, store)
    }

    #[test]
    fn save_preserves_extension() {
        let (_tmp, store) = store();
        let name = store.save(ImageCategory::Doctor, "photo.PNG", b"png-bytes").unwrap();
        assert!(name.ends_with(".png"));
        let path = store.path_of(ImageCategory::Doctor, &name);
        assert_eq!(std::fs::read(path).unwrap(), b"png-bytes");
    }

    #[test]
    fn same_original_name_twice_yields_distinct_files() {
        let (_tmp, store) = store();
        let first = store.save(ImageCategory::Gallery, "x.png", b"one").unwrap();
        let second = store.save(ImageCategory::Gallery, "x.png", b"two").unwrap();
        assert_ne!(first, second);
        assert_eq!(
            std::fs::read(store.path_of(ImageCategory::Gallery, &first)).unwrap(),
            b"one"
        );
    }

    #[test]
    fn categories_use_distinct_directories() {
        let (_tmp, store) = store();
        let a = store.save(ImageCategory::Doctor, "a.jpg", b"a").unwrap();
        let b = store.save(ImageCategory::Schedule, "b.jpg", b"b").unwrap();
        assert!(store.path_of(ImageCategory::Doctor, &a).exists());
        assert!(store.path_of(ImageCategory::Schedule, &b).exists());
        assert!(!store.path_of(ImageCategory::Doctor, &b).exists());
    }

    #[test]
    fn remove_missing_file_is_silent() {
        let (_tmp, store) = store();
        store.remove(ImageCategory::Gallery, "nope.png");
    }

    #[test]
    fn extension_handling() {
        assert_eq!(file_extension("x.png"), ".png");
        assert_eq!(file_extension("x.JPEG"), ".jpeg");
        assert_eq!(file_extension("noext"), "");
        assert_eq!(file_extension("weird.p~g"), "");
    }

    #[test]
    fn public_url_shape() {
        assert_eq!(
            ImageStore::public_url(ImageCategory::Gallery, "f.png"),
            "/uploads/gallery/f.png"
        );
    }
}
