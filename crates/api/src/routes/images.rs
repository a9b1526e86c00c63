//! Image upload and deletion routes.

use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::middleware::AuthUser;
use quill_core::image::{ImageError, ImageService, ImageUpload};
use quill_core::storage::StorageError;

/// Creates the image routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/images", post(upload_images))
        .route("/images", delete(delete_image))
}

/// Query parameters for a batch upload.
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// How many images the editor's gallery already holds; the batch cap is
    /// checked against `existing + batch` before any upload starts.
    #[serde(default)]
    pub existing: usize,
}

/// Request body for deleting a stored image.
#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    /// Public URL of the image to delete.
    pub url: String,
}

fn storage_unavailable() -> axum::response::Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "storage_not_configured",
            "message": "Image storage is not configured"
        })),
    )
        .into_response()
}

/// POST /images - Upload a batch of images for the authenticated owner.
///
/// Every file in the multipart body uploads independently; the response
/// carries per-file outcomes plus the aggregate counts. The whole batch is
/// rejected up front when it would exceed the per-post image limit.
async fn upload_images(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let Some(storage) = &state.storage else {
        return storage_unavailable();
    };

    let mut files = Vec::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let file_name = field
                    .file_name()
                    .unwrap_or("upload")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => files.push(ImageUpload {
                        file_name,
                        content_type,
                        bytes,
                    }),
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({
                                "error": "malformed_upload",
                                "message": e.to_string()
                            })),
                        )
                            .into_response();
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "malformed_upload",
                        "message": e.to_string()
                    })),
                )
                    .into_response();
            }
        }
    }

    if files.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "empty_batch",
                "message": "No files in upload"
            })),
        )
            .into_response();
    }

    let service = ImageService::new(storage.clone(), state.uploads.clone());

    match service
        .upload_batch(auth.user_id(), query.existing, files)
        .await
    {
        Ok(report) => {
            info!(
                owner = %auth.user_id(),
                uploaded = report.uploaded.len(),
                failed = report.failed.len(),
                "Image batch processed"
            );

            let uploaded: Vec<_> = report
                .uploaded
                .iter()
                .map(|u| json!({ "file_name": u.file_name, "url": u.url }))
                .collect();
            let failed: Vec<_> = report
                .failed
                .iter()
                .map(|f| {
                    json!({
                        "file_name": f.file_name,
                        "error": f.error.code(),
                        "message": f.error.to_string()
                    })
                })
                .collect();

            (
                StatusCode::OK,
                Json(json!({
                    "uploaded": uploaded,
                    "failed": failed,
                    "message": report.summary(),
                })),
            )
                .into_response()
        }
        Err(e @ ImageError::TooManyImages { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.code(), "message": e.to_string() })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Image batch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

/// DELETE /images - Remove one stored image by URL (owner-scoped).
async fn delete_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<DeleteImageRequest>,
) -> impl IntoResponse {
    let Some(storage) = &state.storage else {
        return storage_unavailable();
    };

    let service = ImageService::new(storage.clone(), state.uploads.clone());

    match service.delete_by_url(auth.user_id(), &payload.url).await {
        Ok(()) => {
            info!(owner = %auth.user_id(), url = %payload.url, "Image deleted");
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Err(e @ ImageError::ForeignUrl { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.code(), "message": e.to_string() })),
        )
            .into_response(),
        Err(e @ ImageError::NotOwner) => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": e.code(), "message": e.to_string() })),
        )
            .into_response(),
        Err(ImageError::Store(StorageError::NotFound { .. })) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Image not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Image deletion failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{bearer_for, state_without_db};
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn_with_state;
    use http_body_util::BodyExt;
    use quill_core::storage::{ObjectStore, StorageConfig, StorageProvider};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    const BOUNDARY: &str = "quill-test-boundary";

    fn app(state: AppState) -> axum::Router {
        axum::Router::new()
            .merge(routes())
            .layer(from_fn_with_state(
                state.clone(),
                crate::middleware::auth::auth_middleware,
            ))
            .with_state(state)
    }

    fn state_with_storage() -> (AppState, Arc<ObjectStore>) {
        let root = std::env::temp_dir().join(format!("quill-api-images-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("should create temp root");
        let store = Arc::new(
            ObjectStore::from_config(StorageConfig::new(
                StorageProvider::local_fs(root),
                "http://localhost:8080/storage",
            ))
            .expect("should create store"),
        );

        let mut state = state_without_db();
        state.storage = Some(store.clone());
        (state, store)
    }

    fn part(name: &str, content_type: &str, data: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n{data}\r\n"
        )
    }

    fn multipart_request(uri: &str, auth: &str, parts: &[String]) -> Request<Body> {
        let mut body = parts.concat();
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Authorization", auth)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_requires_auth() {
        let app = app(state_without_db());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/images")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_upload_without_storage_returns_503() {
        let state = state_without_db();
        let auth = bearer_for(&state, Uuid::new_v4());
        let app = app(state);

        let request = multipart_request("/images", &auth, &[part("cat.png", "image/png", "data")]);
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_batch_upload_reports_per_file_outcomes() {
        let (state, store) = state_with_storage();
        let owner = Uuid::new_v4();
        let auth = bearer_for(&state, owner);
        let app = app(state);

        let request = multipart_request(
            "/images",
            &auth,
            &[
                part("cat.png", "image/png", "png-bytes"),
                part("notes.txt", "text/plain", "hello"),
            ],
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["uploaded"].as_array().unwrap().len(), 1);
        assert_eq!(json["failed"].as_array().unwrap().len(), 1);
        assert_eq!(json["failed"][0]["error"], "invalid_type");
        assert_eq!(json["message"], "1 succeeded / 1 failed");

        assert_eq!(store.list(&owner.to_string()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_full_batch_rejected_uploads_nothing() {
        let (state, store) = state_with_storage();
        let owner = Uuid::new_v4();
        let auth = bearer_for(&state, owner);
        let app = app(state);

        // Gallery already at the limit of 5.
        let request = multipart_request(
            "/images?existing=5",
            &auth,
            &[part("one-more.png", "image/png", "data")],
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "too_many_images");

        assert!(store.list(&owner.to_string()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let (state, _) = state_with_storage();
        let auth = bearer_for(&state, Uuid::new_v4());
        let app = app(state);

        let request = multipart_request("/images", &auth, &[]);
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_image_roundtrip() {
        let (state, store) = state_with_storage();
        let owner = Uuid::new_v4();
        let auth = bearer_for(&state, owner);
        let app = app(state);

        let upload = multipart_request("/images", &auth, &[part("cat.png", "image/png", "data")]);
        let response = app.clone().oneshot(upload).await.unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let url = json["uploaded"][0]["url"].as_str().unwrap().to_string();

        let delete_request = Request::builder()
            .method("DELETE")
            .uri("/images")
            .header("Authorization", &auth)
            .header("Content-Type", "application/json")
            .body(Body::from(format!(r#"{{"url":"{url}"}}"#)))
            .unwrap();
        let response = app.oneshot(delete_request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(store.list(&owner.to_string()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_foreign_owner_is_forbidden() {
        let (state, _) = state_with_storage();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let owner_auth = bearer_for(&state, owner);
        let stranger_auth = bearer_for(&state, stranger);
        let app = app(state);

        let upload = multipart_request(
            "/images",
            &owner_auth,
            &[part("cat.png", "image/png", "data")],
        );
        let response = app.clone().oneshot(upload).await.unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let url = json["uploaded"][0]["url"].as_str().unwrap().to_string();

        let delete_request = Request::builder()
            .method("DELETE")
            .uri("/images")
            .header("Authorization", &stranger_auth)
            .header("Content-Type", "application/json")
            .body(Body::from(format!(r#"{{"url":"{url}"}}"#)))
            .unwrap();
        let response = app.oneshot(delete_request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
