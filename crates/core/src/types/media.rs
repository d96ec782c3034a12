//! Media kind and upload validation rules.
//!
//! Product posts carry either an image or a short video. The allow-list and
//! size caps here are the single source of truth for upload validation; the
//! server rejects anything else before touching the filesystem.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors produced when classifying an uploaded file.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The content type is not on the allow-list.
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),
    /// The file exceeds the size cap for its kind.
    #[error("{kind} too large: {size} bytes (max {max})")]
    TooLarge {
        /// Kind that was being uploaded.
        kind: MediaKind,
        /// Actual size in bytes.
        size: u64,
        /// Maximum allowed size in bytes.
        max: u64,
    },
}

/// Kind of media attached to a product post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Allowed image content types and their canonical file extensions.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// Allowed video content types and their canonical file extensions.
const VIDEO_TYPES: &[(&str, &str)] = &[
    ("video/mp4", "mp4"),
    ("video/webm", "webm"),
    ("video/quicktime", "mov"),
];

impl MediaKind {
    /// Maximum image upload size (5 MiB).
    pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

    /// Maximum video upload size (50 MiB).
    pub const MAX_VIDEO_BYTES: u64 = 50 * 1024 * 1024;

    /// Classify a content type against the allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::UnsupportedType`] for anything not on the list,
    /// including wildcard and parameterized types.
    pub fn from_content_type(content_type: &str) -> Result<Self, MediaError> {
        let normalized = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim()
            .to_ascii_lowercase();

        if IMAGE_TYPES.iter().any(|(ct, _)| *ct == normalized) {
            return Ok(Self::Image);
        }
        if VIDEO_TYPES.iter().any(|(ct, _)| *ct == normalized) {
            return Ok(Self::Video);
        }
        Err(MediaError::UnsupportedType(content_type.to_owned()))
    }

    /// Classify and size-check an upload in one step.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::UnsupportedType`] or [`MediaError::TooLarge`].
    pub fn validate(content_type: &str, size: u64) -> Result<Self, MediaError> {
        let kind = Self::from_content_type(content_type)?;
        let max = kind.max_bytes();
        if size > max {
            return Err(MediaError::TooLarge { kind, size, max });
        }
        Ok(kind)
    }

    /// Size cap in bytes for this kind.
    #[must_use]
    pub const fn max_bytes(self) -> u64 {
        match self {
            Self::Image => Self::MAX_IMAGE_BYTES,
            Self::Video => Self::MAX_VIDEO_BYTES,
        }
    }

    /// Canonical file extension for a content type on the allow-list.
    #[must_use]
    pub fn extension_for(content_type: &str) -> Option<&'static str> {
        let normalized = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim()
            .to_ascii_lowercase();

        IMAGE_TYPES
            .iter()
            .chain(VIDEO_TYPES.iter())
            .find(|(ct, _)| *ct == normalized)
            .map(|(_, ext)| *ext)
    }

    /// The lowercase database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Parse the database representation.
    #[must_use]
    pub fn from_db(s: &str) -> Self {
        match s {
            "video" => Self::Video,
            _ => Self::Image,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for MediaKind {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for MediaKind {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_db(&s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for MediaKind {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_image_types_accepted() {
        assert_eq!(
            MediaKind::from_content_type("image/jpeg").unwrap(),
            MediaKind::Image
        );
        assert_eq!(
            MediaKind::from_content_type("image/webp").unwrap(),
            MediaKind::Image
        );
    }

    #[test]
    fn test_video_types_accepted() {
        assert_eq!(
            MediaKind::from_content_type("video/mp4").unwrap(),
            MediaKind::Video
        );
    }

    #[test]
    fn test_parameterized_type_normalized() {
        assert_eq!(
            MediaKind::from_content_type("image/png; charset=binary").unwrap(),
            MediaKind::Image
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(matches!(
            MediaKind::from_content_type("application/pdf"),
            Err(MediaError::UnsupportedType(_))
        ));
        assert!(matches!(
            MediaKind::from_content_type("image/*"),
            Err(MediaError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_size_caps() {
        assert!(MediaKind::validate("image/png", MediaKind::MAX_IMAGE_BYTES).is_ok());
        assert!(matches!(
            MediaKind::validate("image/png", MediaKind::MAX_IMAGE_BYTES + 1),
            Err(MediaError::TooLarge {
                kind: MediaKind::Image,
                ..
            })
        ));
        // Videos get the larger cap
        assert!(MediaKind::validate("video/mp4", MediaKind::MAX_IMAGE_BYTES + 1).is_ok());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(MediaKind::extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(MediaKind::extension_for("video/quicktime"), Some("mov"));
        assert_eq!(MediaKind::extension_for("text/plain"), None);
    }
}
