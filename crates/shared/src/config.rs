//! Application configuration management.

use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Object storage configuration (optional; image endpoints return 503
    /// when absent).
    pub storage: Option<StorageSettings>,
    /// Image upload limits.
    #[serde(default)]
    pub uploads: UploadSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

/// Object storage settings.
///
/// `public_base_url` is the prefix under which stored objects are publicly
/// served. Cleanup compares stored objects against referenced URLs by exact
/// string match, so this must match the host the upload flow hands out.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum StorageSettings {
    /// S3-compatible storage (Supabase Storage, Cloudflare R2, AWS S3).
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// Bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
        /// Public URL prefix for stored objects.
        public_base_url: String,
    },
    /// Local filesystem (development only).
    LocalFs {
        /// Root directory path.
        root: PathBuf,
        /// Public URL prefix for stored objects.
        public_base_url: String,
    },
}

/// Image upload limits.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// Maximum image size in bytes.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    /// Maximum images per post.
    #[serde(default = "default_max_images_per_post")]
    pub max_images_per_post: usize,
}

fn default_max_image_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_max_images_per_post() -> usize {
    5
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
            max_images_per_post: default_max_images_per_post(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("QUILL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_settings_defaults() {
        let settings = UploadSettings::default();
        assert_eq!(settings.max_image_bytes, 5 * 1024 * 1024);
        assert_eq!(settings.max_images_per_post, 5);
    }

    #[test]
    fn test_storage_settings_deserialize_local() {
        let settings: StorageSettings = serde_json::from_value(serde_json::json!({
            "provider": "local_fs",
            "root": "./storage",
            "public_base_url": "http://localhost:8080/storage"
        }))
        .expect("should deserialize");
        assert!(matches!(settings, StorageSettings::LocalFs { .. }));
    }

    #[test]
    fn test_storage_settings_deserialize_s3() {
        let settings: StorageSettings = serde_json::from_value(serde_json::json!({
            "provider": "s3",
            "endpoint": "https://project.supabase.co/storage/v1/s3",
            "bucket": "blog-images",
            "access_key_id": "key",
            "secret_access_key": "secret",
            "region": "auto",
            "public_base_url": "https://project.supabase.co/storage/v1/object/public"
        }))
        .expect("should deserialize");
        assert!(matches!(settings, StorageSettings::S3 { .. }));
    }
}
