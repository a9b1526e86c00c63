//! Account routes: register, login, token refresh, logout, profile.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::middleware::AuthUser;
use quill_core::auth::{PasswordError, hash_password, validate_password, verify_password};
use quill_db::repositories::user::NewUser;
use quill_db::{SessionRepository, UserRepository};
use quill_shared::auth::{
    AuthResponse, LoginRequest, RefreshTokenBody, RegisterRequest, TokenPair, UserProfile,
};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Creates auth routes that require an authenticated caller.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn internal_error(context: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": format!("An error occurred during {context}")
        })),
    )
        .into_response()
}

/// One answer for bad email, bad password, and unknown account, so the
/// response does not reveal which one it was.
fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
        })),
    )
        .into_response()
}

fn invalid_refresh_token() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_token",
            "message": "Invalid or expired refresh token"
        })),
    )
        .into_response()
}

fn user_agent_of(headers: &HeaderMap) -> Option<&str> {
    headers.get(USER_AGENT).and_then(|h| h.to_str().ok())
}

fn profile_of(user: quill_db::entities::users::Model) -> UserProfile {
    UserProfile {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        avatar_url: user.avatar_url,
    }
}

/// Issues a token pair and opens the session row behind the refresh token.
async fn issue_tokens(
    state: &AppState,
    user_id: uuid::Uuid,
    user_agent: Option<&str>,
) -> Result<TokenPair, Response> {
    let jwt = &state.jwt_service;
    let access_token = jwt.issue_access_token(user_id).map_err(|e| {
        error!(error = %e, "Failed to issue access token");
        internal_error("login")
    })?;
    let refresh_token = jwt.issue_refresh_token(user_id).map_err(|e| {
        error!(error = %e, "Failed to issue refresh token");
        internal_error("login")
    })?;

    SessionRepository::new((*state.db).clone())
        .open(user_id, &refresh_token, jwt.refresh_ttl(), user_agent)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to open session");
            internal_error("login")
        })?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        expires_in: jwt.access_expires_in_secs(),
    })
}

/// POST /auth/register - Create an account and log it in.
async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(e @ PasswordError::TooShort) = validate_password(&payload.password) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "weak_password",
                "message": e.to_string()
            })),
        )
            .into_response();
    }

    let users = UserRepository::new((*state.db).clone());

    match users.is_email_taken(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "email_exists",
                    "message": "An account with this email already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking email");
            return internal_error("registration");
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error("registration");
        }
    };

    let user = match users
        .register(NewUser {
            email: &payload.email,
            password_hash: &password_hash,
            full_name: &payload.full_name,
        })
        .await
    {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return internal_error("registration");
        }
    };

    let tokens = match issue_tokens(&state, user.id, user_agent_of(&headers)).await {
        Ok(tokens) => tokens,
        Err(response) => return response,
    };

    info!(user_id = %user.id, "User registered");

    (
        StatusCode::CREATED,
        Json(AuthResponse {
            user: profile_of(user),
            tokens,
        }),
    )
        .into_response()
}

/// POST /auth/login - Verify credentials and hand out tokens.
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let users = UserRepository::new((*state.db).clone());

    let user = match users.find_by_email(&payload.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("login");
        }
    };

    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("login");
        }
    }

    let tokens = match issue_tokens(&state, user.id, user_agent_of(&headers)).await {
        Ok(tokens) => tokens,
        Err(response) => return response,
    };

    info!(user_id = %user.id, "User logged in");

    (
        StatusCode::OK,
        Json(AuthResponse {
            user: profile_of(user),
            tokens,
        }),
    )
        .into_response()
}

/// POST /auth/refresh - Rotate the refresh token and issue a new pair.
async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RefreshTokenBody>,
) -> impl IntoResponse {
    // The refresh token is itself a JWT; reject tampered or expired ones
    // before touching the session table.
    if state
        .jwt_service
        .validate_token(&payload.refresh_token)
        .is_err()
    {
        return invalid_refresh_token();
    }

    let sessions = SessionRepository::new((*state.db).clone());

    let session = match sessions.find_live(&payload.refresh_token).await {
        Ok(Some(session)) => session,
        Ok(None) => return invalid_refresh_token(),
        Err(e) => {
            error!(error = %e, "Database error during token refresh");
            return internal_error("token refresh");
        }
    };

    // Rotate: the old session dies with the old token.
    if let Err(e) = sessions.revoke(session.id).await {
        error!(error = %e, "Failed to revoke session");
        return internal_error("token refresh");
    }

    match issue_tokens(&state, session.user_id, user_agent_of(&headers)).await {
        Ok(tokens) => (StatusCode::OK, Json(tokens)).into_response(),
        Err(response) => response,
    }
}

/// POST /auth/logout - Revoke the session behind a refresh token.
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenBody>,
) -> impl IntoResponse {
    let sessions = SessionRepository::new((*state.db).clone());

    match sessions.revoke_token(&payload.refresh_token).await {
        Ok(_) => (StatusCode::NO_CONTENT, ()).into_response(),
        Err(e) => {
            error!(error = %e, "Database error during logout");
            internal_error("logout")
        }
    }
}

/// GET /auth/me - Current user's profile.
async fn me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let users = UserRepository::new((*state.db).clone());

    match users.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => (StatusCode::OK, Json(profile_of(user))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "User no longer exists"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Database error fetching profile");
            internal_error("profile lookup")
        }
    }
}
