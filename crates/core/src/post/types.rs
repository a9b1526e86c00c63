//! Post types and data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post domain model.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Unique identifier.
    pub id: Uuid,
    /// Post title.
    pub title: String,
    /// URL-friendly slug derived from the title.
    pub slug: String,
    /// Post body.
    pub content: String,
    /// Short description shown in listings.
    pub excerpt: Option<String>,
    /// Featured image URL.
    pub featured_image: Option<String>,
    /// Gallery image URLs in insertion order.
    pub images: Vec<String>,
    /// Author's user ID.
    pub author_id: Uuid,
    /// Whether the post is publicly visible.
    pub published: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Editor-submitted post fields, before slug derivation.
#[derive(Debug, Clone, Deserialize)]
pub struct PostDraft {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Short description shown in listings.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Featured image URL (derived from the editor gallery).
    #[serde(default)]
    pub featured_image: Option<String>,
    /// Gallery image URLs (from the editor gallery, insertion order).
    #[serde(default)]
    pub images: Vec<String>,
    /// Publish immediately or keep as draft.
    #[serde(default)]
    pub published: bool,
}

/// Input for creating a post record.
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    /// Author's user ID.
    pub author_id: Uuid,
    /// Post title.
    pub title: String,
    /// Derived slug.
    pub slug: String,
    /// Post body.
    pub content: String,
    /// Short description.
    pub excerpt: Option<String>,
    /// Featured image URL.
    pub featured_image: Option<String>,
    /// Gallery image URLs.
    pub images: Vec<String>,
    /// Publish flag.
    pub published: bool,
}

/// Input for updating a post record.
#[derive(Debug, Clone)]
pub struct UpdatePostInput {
    /// Post title.
    pub title: String,
    /// Derived slug.
    pub slug: String,
    /// Post body.
    pub content: String,
    /// Short description.
    pub excerpt: Option<String>,
    /// Featured image URL.
    pub featured_image: Option<String>,
    /// Gallery image URLs.
    pub images: Vec<String>,
    /// Publish flag.
    pub published: bool,
}

/// The image URLs one post references; cleanup unions these across all of an
/// owner's posts to form the reachable-image set.
#[derive(Debug, Clone, Default)]
pub struct ImageRefs {
    /// Gallery image URLs.
    pub images: Vec<String>,
    /// Featured image URL.
    pub featured_image: Option<String>,
}
