//! Quill API Server
//!
//! Main entry point for the Quill blogging backend.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill_api::{AppState, create_router};
use quill_core::draft::DraftStore;
use quill_core::image::UploadPolicy;
use quill_core::storage::{ObjectStore, StorageConfig, StorageProvider};
use quill_db::connect;
use quill_shared::config::StorageSettings;
use quill_shared::{AppConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url, config.database.max_connections).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
    );

    // Create object store (optional; image endpoints 503 without it)
    let storage = match &config.storage {
        Some(settings) => {
            let storage_config = storage_config_from(settings);
            let store = ObjectStore::from_config(storage_config)?;
            info!(provider = store.provider_name(), "Object storage configured");
            Some(Arc::new(store))
        }
        None => {
            warn!("No object storage configured; image uploads are disabled");
            None
        }
    };

    let uploads = UploadPolicy {
        max_image_bytes: config.uploads.max_image_bytes,
        max_images_per_post: config.uploads.max_images_per_post,
    };

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        storage,
        drafts: Arc::new(DraftStore::new()),
        uploads,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Map deserialized storage settings onto the core storage config.
fn storage_config_from(settings: &StorageSettings) -> StorageConfig {
    match settings {
        StorageSettings::S3 {
            endpoint,
            bucket,
            access_key_id,
            secret_access_key,
            region,
            public_base_url,
        } => StorageConfig::new(
            StorageProvider::s3(endpoint, bucket, access_key_id, secret_access_key, region),
            public_base_url,
        ),
        StorageSettings::LocalFs {
            root,
            public_base_url,
        } => StorageConfig::new(StorageProvider::local_fs(root.clone()), public_base_url),
    }
}
