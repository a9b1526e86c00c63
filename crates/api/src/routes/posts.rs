//! Post routes: public browsing plus authoring endpoints.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::{AuthUser, MaybeAuthUser};
use quill_core::image::CleanupService;
use quill_core::post::{Post, PostDraft, PostError, PostService};
use quill_db::PostRepository;
use quill_shared::types::{PageMeta, PageRequest, PageResponse};

/// Creates the public post routes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/{slug}", get(get_post))
}

/// Creates the authoring post routes.
///
/// Everything lives under `/me/posts`: the public `{slug}` pattern and the
/// authoring `{id}` pattern never share a route position, and no path is
/// registered in both the public and the auth-layered router.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/me/posts", post(create_post))
        .route("/me/posts", get(my_posts))
        .route("/me/posts/{id}", put(update_post))
        .route("/me/posts/{id}", delete(delete_post))
}

fn service(state: &AppState) -> PostService<PostRepository> {
    PostService::new(Arc::new(PostRepository::new((*state.db).clone())))
}

fn error_response(e: &PostError) -> axum::response::Response {
    let (status, code) = match e {
        PostError::NotFound(_) | PostError::SlugNotFound(_) => {
            (StatusCode::NOT_FOUND, "not_found")
        }
        PostError::SlugTaken(_) => (StatusCode::CONFLICT, "slug_taken"),
        PostError::NotAuthor => (StatusCode::FORBIDDEN, "not_author"),
        PostError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        PostError::Repository(_) => {
            error!(error = %e, "Post repository error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    };

    (
        status,
        Json(json!({ "error": code, "message": e.to_string() })),
    )
        .into_response()
}

/// Best-effort image cleanup after a successful save or delete.
///
/// `retained` is the saved post's current image set; failures are absorbed
/// inside the service and never affect the response.
async fn reconcile_images(state: &AppState, owner: Uuid, retained: &[String]) {
    let Some(storage) = &state.storage else {
        return;
    };
    let posts = Arc::new(PostRepository::new((*state.db).clone()));
    CleanupService::new(storage.clone(), posts)
        .reconcile(owner, retained)
        .await;
}

fn retained_urls(post: &Post) -> Vec<String> {
    let mut urls = post.images.clone();
    if let Some(featured) = &post.featured_image {
        urls.push(featured.clone());
    }
    urls
}

/// GET /posts - Published posts, newest first.
async fn list_posts(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    match service(&state)
        .list_published(page.offset(), page.limit())
        .await
    {
        Ok((posts, total)) => {
            let meta = PageMeta::new(&page, total);
            (StatusCode::OK, Json(PageResponse { data: posts, meta })).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET /posts/{slug} - Single post; drafts only for their author.
async fn get_post(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match service(&state).get_visible(&slug, viewer.user_id()).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /me/posts - Create a post from the editor draft.
async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(draft): Json<PostDraft>,
) -> impl IntoResponse {
    match service(&state).create(auth.user_id(), draft).await {
        Ok(created) => {
            info!(post_id = %created.id, author_id = %created.author_id, "Post created");
            (StatusCode::CREATED, Json(created)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// PUT /me/posts/{id} - Update a post; reconciles stored images afterwards.
async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(draft): Json<PostDraft>,
) -> impl IntoResponse {
    let updated = match service(&state).update(id, auth.user_id(), draft).await {
        Ok(updated) => updated,
        Err(e) => return error_response(&e),
    };

    info!(post_id = %updated.id, "Post updated");

    // The save already succeeded; orphan cleanup is silent housekeeping.
    reconcile_images(&state, auth.user_id(), &retained_urls(&updated)).await;

    (StatusCode::OK, Json(updated)).into_response()
}

/// DELETE /me/posts/{id} - Delete a post, then reclaim its unused images.
async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = service(&state).delete(id, auth.user_id()).await {
        return error_response(&e);
    }

    info!(post_id = %id, "Post deleted");
    reconcile_images(&state, auth.user_id(), &[]).await;

    (StatusCode::NO_CONTENT, ()).into_response()
}

/// GET /me/posts - The author's own posts, drafts included.
async fn my_posts(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    match service(&state).list_own(auth.user_id()).await {
        Ok(posts) => (StatusCode::OK, Json(json!({ "posts": posts }))).into_response(),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::state_without_db;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn_with_state;
    use tower::ServiceExt;

    fn protected_app(state: AppState) -> Router {
        Router::new()
            .merge(protected_routes())
            .layer(from_fn_with_state(
                state.clone(),
                crate::middleware::auth::auth_middleware,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_create_post_requires_auth() {
        let app = protected_app(state_without_db());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/me/posts")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"title":"T","content":"C"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let app = protected_app(state_without_db());

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/me/posts")
                    .header("Authorization", "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
