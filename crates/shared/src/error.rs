//! Application-wide error taxonomy.
//!
//! Library crates carry their own typed errors; this enum is the common
//! denominator the API layer maps those into when building responses.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy, one variant per response class.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict, e.g. a duplicate slug or email.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Object storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Storage(_) | Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code for API error envelopes.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn variant(code: &str) -> AppError {
        match code {
            "UNAUTHORIZED" => AppError::Unauthorized(String::new()),
            "FORBIDDEN" => AppError::Forbidden(String::new()),
            "NOT_FOUND" => AppError::NotFound(String::new()),
            "VALIDATION_ERROR" => AppError::Validation(String::new()),
            "CONFLICT" => AppError::Conflict(String::new()),
            "DATABASE_ERROR" => AppError::Database(String::new()),
            "STORAGE_ERROR" => AppError::Storage(String::new()),
            _ => AppError::Internal(String::new()),
        }
    }

    #[rstest]
    #[case("UNAUTHORIZED", 401)]
    #[case("FORBIDDEN", 403)]
    #[case("NOT_FOUND", 404)]
    #[case("VALIDATION_ERROR", 400)]
    #[case("CONFLICT", 409)]
    #[case("DATABASE_ERROR", 500)]
    #[case("STORAGE_ERROR", 500)]
    #[case("INTERNAL_ERROR", 500)]
    fn test_status_and_code(#[case] code: &str, #[case] status: u16) {
        let error = variant(code);
        assert_eq!(error.status_code(), status);
        assert_eq!(error.error_code(), code);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("post".into()).to_string(),
            "Not found: post"
        );
        assert_eq!(
            AppError::Storage("remove failed".into()).to_string(),
            "Storage error: remove failed"
        );
    }
}
