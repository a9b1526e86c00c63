//! Image upload error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Image upload and deletion errors.
#[derive(Debug, Error)]
pub enum ImageError {
    /// File is not an image.
    #[error("'{mime_type}' is not an image type")]
    InvalidType {
        /// The rejected MIME type.
        mime_type: String,
    },

    /// File size exceeds the per-image limit.
    #[error("image size {size} bytes exceeds maximum allowed {max} bytes")]
    TooLarge {
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Batch would push the post over the image limit.
    ///
    /// Checked before any upload starts; a rejected batch performs zero
    /// storage calls.
    #[error("post already has {existing} images; adding {adding} exceeds the maximum of {max}")]
    TooManyImages {
        /// Images already attached to the post.
        existing: usize,
        /// Images in the rejected batch.
        adding: usize,
        /// Maximum images per post.
        max: usize,
    },

    /// URL does not point into this store.
    #[error("URL is not a stored image: {url}")]
    ForeignUrl {
        /// The unrecognized URL.
        url: String,
    },

    /// URL points at another owner's namespace.
    #[error("image belongs to another owner")]
    NotOwner,

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Store(#[from] StorageError),
}

impl ImageError {
    /// Create an invalid-type error.
    #[must_use]
    pub fn invalid_type(mime_type: impl Into<String>) -> Self {
        Self::InvalidType {
            mime_type: mime_type.into(),
        }
    }

    /// Create a too-large error.
    #[must_use]
    pub fn too_large(size: u64, max: u64) -> Self {
        Self::TooLarge { size, max }
    }

    /// Create a foreign-URL error.
    #[must_use]
    pub fn foreign_url(url: impl Into<String>) -> Self {
        Self::ForeignUrl { url: url.into() }
    }

    /// Short machine-readable code for API responses.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidType { .. } => "invalid_type",
            Self::TooLarge { .. } => "too_large",
            Self::TooManyImages { .. } => "too_many_images",
            Self::ForeignUrl { .. } => "foreign_url",
            Self::NotOwner => "not_owner",
            Self::Store(_) => "store_error",
        }
    }
}
