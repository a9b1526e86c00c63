//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Shared application state

pub mod middleware;
pub mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use quill_core::draft::DraftStore;
use quill_core::image::UploadPolicy;
use quill_core::storage::ObjectStore;
use quill_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Object store for post images (optional).
    pub storage: Option<Arc<ObjectStore>>,
    /// Preview draft store.
    pub drafts: Arc<DraftStore>,
    /// Image upload limits.
    pub uploads: UploadPolicy,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    // A whole image batch arrives in one multipart request.
    let body_limit = usize::try_from(state.uploads.max_image_bytes)
        .unwrap_or(usize::MAX)
        .saturating_mul(state.uploads.max_images_per_post)
        .saturating_add(1024 * 1024);

    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// State backed by a disconnected database; suitable for routes that
    /// never reach it.
    pub(crate) fn state_without_db() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::default()),
            jwt_service: Arc::new(JwtService::new("test-secret", 900, 7 * 24 * 3600)),
            storage: None,
            drafts: Arc::new(DraftStore::new()),
            uploads: UploadPolicy::default(),
        }
    }

    pub(crate) fn bearer_for(state: &AppState, user_id: uuid::Uuid) -> String {
        let token = state
            .jwt_service
            .issue_access_token(user_id)
            .expect("should issue token");
        format!("Bearer {token}")
    }
}
