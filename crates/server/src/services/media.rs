//! Local filesystem media store.
//!
//! Uploads are validated against the media allow-lists, written under
//! `<root>/<category>/<user_id>/<uuid>.<ext>`, and served back by the
//! static `/media` route. Filenames are server-generated, so client input
//! never reaches the filesystem path.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use shopreel_core::{MediaError, MediaKind, UserId};

/// Upload errors: validation, multipart parsing, or storage.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Media failed type or size validation.
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Request had no file part.
    #[error("no file provided")]
    MissingFile,

    /// Request was missing a required form field.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Multipart body could not be parsed.
    #[error("invalid multipart request: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// Filesystem write failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where an upload belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    /// Product feed media (images and videos).
    Products,
    /// Profile avatars.
    Avatars,
    /// Profile cover images.
    Covers,
}

impl MediaCategory {
    /// Directory name under the media root.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Avatars => "avatars",
            Self::Covers => "covers",
        }
    }
}

/// A stored upload.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    /// URL path the file is served from (under `/media`).
    pub public_url: String,
    /// Validated media kind.
    pub kind: MediaKind,
}

/// Filesystem-backed media storage.
#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Create a media store rooted at `root`.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The directory uploads are stored under.
    #[must_use]
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Validate and store an upload, returning its public URL.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Media` if the content type or size is rejected,
    /// or `UploadError::Io` if the write fails.
    pub async fn store(
        &self,
        category: MediaCategory,
        owner: UserId,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredMedia, UploadError> {
        let kind = MediaKind::validate(content_type, bytes.len() as u64)?;
        let ext = MediaKind::extension_for(content_type).unwrap_or("bin");

        let dir = self.root.join(category.as_str()).join(owner.to_string());
        tokio::fs::create_dir_all(&dir).await?;

        let filename = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::write(dir.join(&filename), bytes).await?;

        Ok(StoredMedia {
            public_url: format!("/media/{}/{owner}/{filename}", category.as_str()),
            kind,
        })
    }

    /// Delete a stored file by its public URL.
    ///
    /// Used to clean up orphaned files when the database insert after an
    /// upload fails, and when a product is deleted. Unknown or already
    /// deleted files are ignored.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` for filesystem errors other than not-found.
    pub async fn remove(&self, public_url: &str) -> Result<(), UploadError> {
        let Some(relative) = public_url.strip_prefix("/media/") else {
            return Ok(());
        };
        // Server-generated URLs never contain traversal segments; anything
        // else is not ours to delete.
        if relative.split('/').any(|segment| segment == ".." || segment.is_empty()) {
            return Ok(());
        }

        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, MediaStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[tokio::test]
    async fn test_store_writes_file() {
        let (_dir, store) = store();
        let owner = UserId::generate();

        let stored = store
            .store(MediaCategory::Products, owner, "image/jpeg", b"fake jpeg")
            .await
            .unwrap();

        assert_eq!(stored.kind, MediaKind::Image);
        assert!(stored.public_url.starts_with(&format!("/media/products/{owner}/")));
        assert!(stored.public_url.ends_with(".jpg"));

        let on_disk = store
            .root()
            .join(stored.public_url.strip_prefix("/media/").unwrap());
        assert_eq!(tokio::fs::read(on_disk).await.unwrap(), b"fake jpeg");
    }

    #[tokio::test]
    async fn test_store_rejects_unsupported_type() {
        let (_dir, store) = store();

        let err = store
            .store(
                MediaCategory::Products,
                UserId::generate(),
                "application/pdf",
                b"%PDF",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Media(MediaError::UnsupportedType(_))));
    }

    #[tokio::test]
    async fn test_store_rejects_oversized_image() {
        let (_dir, store) = store();
        let too_big = vec![0_u8; 5 * 1024 * 1024 + 1];

        let err = store
            .store(
                MediaCategory::Avatars,
                UserId::generate(),
                "image/png",
                &too_big,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Media(MediaError::TooLarge { .. })));
    }

    #[tokio::test]
    async fn test_remove_deletes_stored_file() {
        let (_dir, store) = store();
        let owner = UserId::generate();

        let stored = store
            .store(MediaCategory::Covers, owner, "image/webp", b"webp bytes")
            .await
            .unwrap();

        store.remove(&stored.public_url).await.unwrap();

        let on_disk = store
            .root()
            .join(stored.public_url.strip_prefix("/media/").unwrap());
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_ok() {
        let (_dir, store) = store();
        store
            .remove("/media/products/none/nothing.jpg")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_remove_ignores_foreign_paths() {
        let (_dir, store) = store();
        store.remove("/etc/passwd").await.unwrap();
        store.remove("/media/../outside.txt").await.unwrap();
    }
}
