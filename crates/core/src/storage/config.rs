//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend the object store talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// Any S3-compatible service: Supabase Storage, Cloudflare R2, AWS S3.
    S3 {
        /// Endpoint URL of the service.
        endpoint: String,
        /// Bucket holding the image objects.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region; `auto` for providers that ignore it.
        region: String,
    },
    /// Local filesystem, for development and tests.
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// S3-compatible provider (Supabase Storage, Cloudflare R2, AWS S3).
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Local filesystem provider, for development and tests.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Short provider name, for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
        }
    }

    /// The bucket segment of public URLs; for local storage, the root
    /// directory's name stands in.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } => bucket,
            Self::LocalFs { root } => root
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("local"),
        }
    }
}

/// Object store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Public URL prefix under which objects are served.
    ///
    /// Cleanup decides reachability by exact string comparison between
    /// stored-object URLs and the URLs referenced by posts, so this must
    /// match the host handed out at upload time, byte for byte.
    pub public_base_url: String,
}

impl StorageConfig {
    /// Create a new storage config.
    #[must_use]
    pub fn new(provider: StorageProvider, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into();
        Self {
            provider,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}
