//! JWT issuing and validation.
//!
//! One service issues both token kinds; they differ only in lifetime. The
//! refresh token additionally backs a server-side session row, so revocation
//! is handled at the session layer, not here.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is invalid.
    #[error("invalid token")]
    Invalid,
}

/// Issues and validates HS256 tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Creates a token service from the signing secret and token lifetimes.
    #[must_use]
    pub fn new(secret: &str, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::seconds(i64::try_from(access_ttl_secs).unwrap_or(i64::MAX)),
            refresh_ttl: Duration::seconds(i64::try_from(refresh_ttl_secs).unwrap_or(i64::MAX)),
        }
    }

    fn issue(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = Claims::issued_for(user_id, expires_at);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Issues a short-lived access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if encoding fails.
    pub fn issue_access_token(&self, user_id: Uuid) -> Result<String, JwtError> {
        self.issue(user_id, Utc::now() + self.access_ttl)
    }

    /// Issues a long-lived refresh token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if encoding fails.
    pub fn issue_refresh_token(&self, user_id: Uuid) -> Result<String, JwtError> {
        self.issue(user_id, Utc::now() + self.refresh_ttl)
    }

    /// Validates a token and returns its claims.
    ///
    /// # Errors
    ///
    /// `JwtError::Expired` for expired tokens, `JwtError::Invalid` for
    /// anything else that fails validation.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid,
            })
    }

    /// Access token lifetime in seconds, for `expires_in` fields.
    #[must_use]
    pub fn access_expires_in_secs(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Refresh token lifetime; the session row expires together with it.
    #[must_use]
    pub const fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}
