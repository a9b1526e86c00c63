//! Draft preview routes.
//!
//! The editor parks an unsaved draft under a fresh key and opens the preview
//! view against it; entries expire on their own.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use quill_core::draft::Draft;

/// Creates the preview routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/preview", post(create_preview))
        .route("/preview/{id}", get(get_preview))
}

/// POST /preview - Park a draft for preview; returns its key.
async fn create_preview(
    State(state): State<AppState>,
    Json(draft): Json<Draft>,
) -> impl IntoResponse {
    let id = state.drafts.put(draft);
    (StatusCode::CREATED, Json(json!({ "id": id })))
}

/// GET /preview/{id} - Fetch a parked draft; expired keys are gone.
async fn get_preview(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.drafts.get(id) {
        Some(draft) => (StatusCode::OK, Json(draft.as_ref().clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Preview expired or never existed"
            })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::state_without_db;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> axum::Router {
        let state = state_without_db();
        axum::Router::new().merge(routes()).with_state(state)
    }

    #[tokio::test]
    async fn test_preview_roundtrip() {
        let app = app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/preview")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"title":"Draft","content":"Body","images":["https://cdn.example/a.png"]}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let id = json["id"].as_str().unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/preview/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let draft: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(draft["title"], "Draft");
        assert_eq!(draft["images"][0], "https://cdn.example/a.png");
    }

    #[tokio::test]
    async fn test_unknown_preview_is_404() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri(format!("/preview/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
