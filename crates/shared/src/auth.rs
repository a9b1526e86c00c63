//! Auth payload types shared between the token service and the API layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by both access and refresh tokens.
///
/// Deliberately minimal: the subject is the user id, everything else about
/// the user lives in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Claims for a token issued now, expiring at `expires_at`.
    #[must_use]
    pub fn issued_for(user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// The authenticated user's ID.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Access/refresh token pair handed out on login, register, and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token backing a server-side session.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
    /// User full name.
    pub full_name: String,
}

/// Body carrying a refresh token; used by both refresh and logout.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenBody {
    /// The refresh token.
    pub refresh_token: String,
}

/// Public view of an account, as returned by the auth endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// User full name.
    pub full_name: String,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
}

/// Response for login and register: the profile plus a token pair.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Authenticated user's profile.
    pub user: UserProfile,
    /// Issued tokens, flattened into the response body.
    #[serde(flatten)]
    pub tokens: TokenPair,
}
