//! Image upload service.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::debug;
use uuid::Uuid;

use super::error::ImageError;
use crate::storage::ObjectStore;

/// Upload limits applied before any storage call.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Maximum image size in bytes.
    pub max_image_bytes: u64,
    /// Maximum images per post.
    pub max_images_per_post: usize,
}

impl UploadPolicy {
    /// Default per-image size limit: 5 MiB.
    pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
    /// Default per-post image limit.
    pub const DEFAULT_MAX_IMAGES_PER_POST: usize = 5;
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_image_bytes: Self::DEFAULT_MAX_IMAGE_BYTES,
            max_images_per_post: Self::DEFAULT_MAX_IMAGES_PER_POST,
        }
    }
}

/// A single file submitted for upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original file name (extension source).
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: Bytes,
}

/// A successfully stored image.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Original file name.
    pub file_name: String,
    /// Canonical public URL of the stored object.
    pub url: String,
}

/// A file that failed to upload; the rest of its batch is unaffected.
#[derive(Debug)]
pub struct FailedUpload {
    /// Original file name.
    pub file_name: String,
    /// What went wrong.
    pub error: ImageError,
}

/// Aggregated outcome of a batch upload.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files stored, in completion order.
    pub uploaded: Vec<UploadedImage>,
    /// Files that failed, in completion order.
    pub failed: Vec<FailedUpload>,
}

impl BatchReport {
    /// User-facing summary line.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} succeeded / {} failed",
            self.uploaded.len(),
            self.failed.len()
        )
    }
}

/// Service for uploading and deleting stored images.
pub struct ImageService {
    store: Arc<ObjectStore>,
    policy: UploadPolicy,
}

impl ImageService {
    /// Create a new image service.
    #[must_use]
    pub fn new(store: Arc<ObjectStore>, policy: UploadPolicy) -> Self {
        Self { store, policy }
    }

    /// Validate a file against the upload policy.
    ///
    /// Runs before any storage call so invalid files cost zero network
    /// round-trips.
    ///
    /// # Errors
    ///
    /// Returns `InvalidType` for non-image MIME types and `TooLarge` for
    /// oversized files.
    pub fn validate(&self, upload: &ImageUpload) -> Result<(), ImageError> {
        if !upload.content_type.starts_with("image/") {
            return Err(ImageError::invalid_type(&upload.content_type));
        }

        let size = upload.bytes.len() as u64;
        if size > self.policy.max_image_bytes {
            return Err(ImageError::too_large(size, self.policy.max_image_bytes));
        }

        Ok(())
    }

    /// Upload a single image into the owner's namespace.
    ///
    /// The derived key is `{owner}/{millis}-{token}.{ext}`; the timestamp
    /// plus random token keeps concurrent uploads collision-free, and the
    /// store's no-overwrite put backstops a collision anyway. No automatic
    /// retry on store failure.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any storage call, or
    /// `ImageError::Store` when the write fails.
    pub async fn upload(
        &self,
        owner: Uuid,
        upload: ImageUpload,
    ) -> Result<UploadedImage, ImageError> {
        self.validate(&upload)?;

        let key = derive_key(owner, &upload.file_name);
        self.store.put(&key, upload.bytes).await?;

        Ok(UploadedImage {
            file_name: upload.file_name,
            url: self.store.public_url(&key),
        })
    }

    /// Upload a batch of images concurrently.
    ///
    /// The whole batch is rejected up front - zero storage calls - when the
    /// editor's current image count plus the batch would exceed the per-post
    /// limit. Otherwise every file uploads independently: one failure never
    /// aborts or rolls back the others, and per-file outcomes are aggregated
    /// into a single report.
    ///
    /// # Errors
    ///
    /// Returns `TooManyImages` when the batch is rejected outright;
    /// per-file failures land in the report instead.
    pub async fn upload_batch(
        &self,
        owner: Uuid,
        existing_count: usize,
        files: Vec<ImageUpload>,
    ) -> Result<BatchReport, ImageError> {
        let adding = files.len();
        if existing_count + adding > self.policy.max_images_per_post {
            return Err(ImageError::TooManyImages {
                existing: existing_count,
                adding,
                max: self.policy.max_images_per_post,
            });
        }

        // Results are collected as uploads finish, so the report (and the
        // gallery built from it) is in completion order, not submission
        // order.
        let mut tasks: FuturesUnordered<_> = files
            .into_iter()
            .map(|file| {
                let file_name = file.file_name.clone();
                async move { (file_name, self.upload(owner, file).await) }
            })
            .collect();

        let mut report = BatchReport::default();
        while let Some((file_name, result)) = tasks.next().await {
            match result {
                Ok(uploaded) => report.uploaded.push(uploaded),
                Err(error) => {
                    debug!(owner = %owner, file = %file_name, error = %error, "image upload failed");
                    report.failed.push(FailedUpload { file_name, error });
                }
            }
        }

        Ok(report)
    }

    /// Delete a stored image by its public URL.
    ///
    /// Owner-scoped: the URL must map back into the caller's namespace.
    ///
    /// # Errors
    ///
    /// Returns `ForeignUrl` for URLs outside this store, `NotOwner` for
    /// another owner's object, or `ImageError::Store` when deletion fails.
    pub async fn delete_by_url(&self, owner: Uuid, url: &str) -> Result<(), ImageError> {
        let key = self
            .store
            .key_from_public_url(url)
            .ok_or_else(|| ImageError::foreign_url(url))?;

        if !key.starts_with(&format!("{owner}/")) {
            return Err(ImageError::NotOwner);
        }

        self.store.delete(&key).await?;
        Ok(())
    }
}

/// Derive an owner-namespaced storage key for an upload.
fn derive_key(owner: Uuid, file_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let token = Uuid::new_v4().simple();
    format!("{owner}/{millis}-{token}.{ext}", ext = extension_of(file_name))
}

/// File extension after the last dot, or `bin` when there is none.
fn extension_of(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map_or("bin", |(_, ext)| if ext.is_empty() { "bin" } else { ext })
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // For any MIME type, validation accepts exactly the `image/` prefix.
    proptest! {
        #[test]
        fn prop_mime_prefix_decides_validity(mime in "[a-z]{1,12}/[a-z0-9.+-]{1,20}") {
            let policy = UploadPolicy::default();
            let upload = ImageUpload {
                file_name: "file".to_string(),
                content_type: mime.clone(),
                bytes: Bytes::from_static(b"data"),
            };
            // Validation is pure; no store is needed for the check itself.
            let store = {
                let root = std::env::temp_dir().join("quill-prop-mime");
                let _ = std::fs::create_dir_all(&root);
                std::sync::Arc::new(
                    crate::storage::ObjectStore::from_config(crate::storage::StorageConfig::new(
                        crate::storage::StorageProvider::local_fs(root),
                        "http://localhost/storage",
                    ))
                    .unwrap(),
                )
            };
            let service = ImageService::new(store, policy);

            let result = service.validate(&upload);
            if mime.starts_with("image/") {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(matches!(result, Err(ImageError::InvalidType { .. })), "expected InvalidType error");
            }
        }
    }

    // For any size over the limit, validation rejects; at or under, accepts.
    proptest! {
        #[test]
        fn prop_size_limit(max in 1u64..4096, size in 0u64..8192) {
            let policy = UploadPolicy {
                max_image_bytes: max,
                ..UploadPolicy::default()
            };
            let root = std::env::temp_dir().join("quill-prop-size");
            let _ = std::fs::create_dir_all(&root);
            let store = std::sync::Arc::new(
                crate::storage::ObjectStore::from_config(crate::storage::StorageConfig::new(
                    crate::storage::StorageProvider::local_fs(root),
                    "http://localhost/storage",
                ))
                .unwrap(),
            );
            let service = ImageService::new(store, policy);

            let upload = ImageUpload {
                file_name: "img.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: Bytes::from(vec![0u8; usize::try_from(size).unwrap()]),
            };

            let result = service.validate(&upload);
            if size <= max {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(matches!(result, Err(ImageError::TooLarge { .. })), "expected TooLarge error");
            }
        }
    }

    // Derived keys always live in the owner's namespace and keep the extension.
    proptest! {
        #[test]
        fn prop_key_is_owner_namespaced(name in "[a-zA-Z0-9_-]{1,24}\\.[a-z]{2,4}") {
            let owner = Uuid::new_v4();
            let key = derive_key(owner, &name);

            prop_assert!(key.starts_with(&format!("{owner}/")), "key should be owner-namespaced");
            let ext = name.rsplit_once('.').unwrap().1;
            prop_assert!(key.ends_with(&format!(".{ext}")), "key should keep the extension");
        }
    }
}
