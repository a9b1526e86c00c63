//! Route modules and their assembly into the versioned API router.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod health;
pub mod images;
pub mod posts;
pub mod preview;

/// Assembles all routes; the state is needed here so the auth layer can
/// reach the JWT service.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(auth::protected_routes())
        .merge(posts::protected_routes())
        .merge(images::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(posts::public_routes())
        .merge(preview::routes())
        .merge(protected)
}
