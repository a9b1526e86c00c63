//! Post error types.

use thiserror::Error;
use uuid::Uuid;

/// Post operation errors.
#[derive(Debug, Error)]
pub enum PostError {
    /// Post not found by ID.
    #[error("post not found: {0}")]
    NotFound(Uuid),

    /// Post not found by slug (or not visible to the viewer).
    #[error("post not found: {0}")]
    SlugNotFound(String),

    /// Another post already uses this slug.
    #[error("slug already taken: {0}")]
    SlugTaken(String),

    /// Caller is not the post's author.
    #[error("only the author can modify this post")]
    NotAuthor,

    /// Invalid post content.
    #[error("validation error: {0}")]
    Validation(String),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl PostError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
