//! Object store client implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{EntryMode, Operator, services};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Client for the remote object store.
///
/// Object keys are owner-namespaced: `{owner}/{unique_name}.{ext}`. The
/// owner prefix is the unit of listing and the blast-radius bound for
/// deletion; nothing in this client ever touches a key outside the prefix
/// it is given.
pub struct ObjectStore {
    operator: Operator,
    config: StorageConfig,
}

impl ObjectStore {
    /// Create a new object store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Store an object at `key`. Never overwrites: a key collision fails
    /// with `StorageError::AlreadyExists` instead of replacing the object.
    ///
    /// # Errors
    ///
    /// Returns an error if the key already exists or the write fails.
    pub async fn put(&self, key: &str, bytes: Bytes) -> Result<(), StorageError> {
        self.operator
            .write_with(key, bytes)
            .if_not_exists(true)
            .await
            .map_err(|e| match StorageError::from(e) {
                StorageError::AlreadyExists { .. } => StorageError::already_exists(key),
                other => other,
            })?;
        Ok(())
    }

    /// List object keys under a namespace prefix.
    ///
    /// An owner that has never uploaded anything has no namespace yet; that
    /// case yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = if prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{prefix}/")
        };

        let entries = match self.operator.list(&prefix).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(entries
            .into_iter()
            .filter(|entry| entry.metadata().mode() != EntryMode::DIR)
            .map(|entry| entry.path().to_string())
            .collect())
    }

    /// Delete a batch of objects in a single remove call.
    ///
    /// # Errors
    ///
    /// Returns an error if the batched delete fails.
    pub async fn remove(&self, keys: Vec<String>) -> Result<(), StorageError> {
        if keys.is_empty() {
            return Ok(());
        }
        self.operator.delete_iter(keys).await?;
        Ok(())
    }

    /// Delete a single object.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// Canonical public URL for a stored object.
    ///
    /// Format: `{public_base_url}/{bucket}/{key}`. Reachability checks in
    /// cleanup compare these strings exactly, so the same function is the
    /// single source of URLs at upload time and at reconcile time.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.public_base_url,
            self.config.provider.bucket(),
            key
        )
    }

    /// Map a public URL back to its storage key, if the URL belongs to this
    /// store.
    #[must_use]
    pub fn key_from_public_url(&self, url: &str) -> Option<String> {
        let prefix = format!(
            "{}/{}/",
            self.config.public_base_url,
            self.config.provider.bucket()
        );
        url.strip_prefix(&prefix)
            .filter(|key| !key.is_empty())
            .map(String::from)
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}
