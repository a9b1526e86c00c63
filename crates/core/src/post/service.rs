//! Post service implementation.

use std::sync::Arc;

use uuid::Uuid;

use super::error::PostError;
use super::slug::generate_slug;
use super::types::{CreatePostInput, ImageRefs, Post, PostDraft, UpdatePostInput};

/// Repository trait for post persistence.
///
/// This trait is implemented by the db crate to provide actual database
/// operations. No transactional coupling is assumed between a save and the
/// image cleanup that may follow it.
pub trait PostRepository: Send + Sync {
    /// Create a new post record.
    fn create(
        &self,
        input: CreatePostInput,
    ) -> impl std::future::Future<Output = Result<Post, PostError>> + Send;

    /// Update an existing post record.
    fn update(
        &self,
        id: Uuid,
        input: UpdatePostInput,
    ) -> impl std::future::Future<Output = Result<Post, PostError>> + Send;

    /// Find a post by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Post>, PostError>> + Send;

    /// Find a post by slug.
    fn find_by_slug(
        &self,
        slug: &str,
    ) -> impl std::future::Future<Output = Result<Option<Post>, PostError>> + Send;

    /// List published posts, newest first; returns the page plus the total
    /// published count.
    fn list_published(
        &self,
        offset: u64,
        limit: u64,
    ) -> impl std::future::Future<Output = Result<(Vec<Post>, u64), PostError>> + Send;

    /// List all of an author's posts, drafts included, newest first.
    fn list_by_author(
        &self,
        author_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Post>, PostError>> + Send;

    /// Delete a post owned by the author. Returns whether a row was removed.
    fn delete(
        &self,
        id: Uuid,
        author_id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, PostError>> + Send;

    /// The image references of every post owned by an author - the
    /// authority the cleanup service reconciles against.
    fn image_refs_by_author(
        &self,
        author_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ImageRefs>, PostError>> + Send;
}

/// Post service applying slugs, validation, and author checks.
pub struct PostService<R: PostRepository> {
    repo: Arc<R>,
}

impl<R: PostRepository> PostService<R> {
    /// Create a new post service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create a post from an editor draft.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty title/content, `SlugTaken` when
    /// another post already uses the derived slug, or a repository error.
    pub async fn create(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, PostError> {
        validate_draft(&draft)?;
        let slug = generate_slug(&draft.title);

        if self.repo.find_by_slug(&slug).await?.is_some() {
            return Err(PostError::SlugTaken(slug));
        }

        self.repo
            .create(CreatePostInput {
                author_id,
                title: draft.title,
                slug,
                content: draft.content,
                excerpt: draft.excerpt,
                featured_image: draft.featured_image,
                images: draft.images,
                published: draft.published,
            })
            .await
    }

    /// Update a post from an editor draft.
    ///
    /// Only the author may update. The slug is re-derived from the new
    /// title; a slug collision with a *different* post is rejected.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `NotAuthor`, `SlugTaken`, a validation error, or
    /// a repository error.
    pub async fn update(
        &self,
        id: Uuid,
        author_id: Uuid,
        draft: PostDraft,
    ) -> Result<Post, PostError> {
        validate_draft(&draft)?;

        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id))?;
        if existing.author_id != author_id {
            return Err(PostError::NotAuthor);
        }

        let slug = generate_slug(&draft.title);
        if slug != existing.slug {
            if let Some(other) = self.repo.find_by_slug(&slug).await? {
                if other.id != id {
                    return Err(PostError::SlugTaken(slug));
                }
            }
        }

        self.repo
            .update(
                id,
                UpdatePostInput {
                    title: draft.title,
                    slug,
                    content: draft.content,
                    excerpt: draft.excerpt,
                    featured_image: draft.featured_image,
                    images: draft.images,
                    published: draft.published,
                },
            )
            .await
    }

    /// Fetch a post by slug as seen by `viewer`.
    ///
    /// Drafts are visible only to their author; to anyone else an
    /// unpublished post does not exist.
    ///
    /// # Errors
    ///
    /// Returns `SlugNotFound` or a repository error.
    pub async fn get_visible(
        &self,
        slug: &str,
        viewer: Option<Uuid>,
    ) -> Result<Post, PostError> {
        let post = self
            .repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| PostError::SlugNotFound(slug.to_string()))?;

        if post.published || viewer == Some(post.author_id) {
            Ok(post)
        } else {
            Err(PostError::SlugNotFound(slug.to_string()))
        }
    }

    /// List published posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns a repository error.
    pub async fn list_published(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Post>, u64), PostError> {
        self.repo.list_published(offset, limit).await
    }

    /// List the author's own posts, drafts included.
    ///
    /// # Errors
    ///
    /// Returns a repository error.
    pub async fn list_own(&self, author_id: Uuid) -> Result<Vec<Post>, PostError> {
        self.repo.list_by_author(author_id).await
    }

    /// Delete a post owned by the author.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `NotAuthor`, or a repository error.
    pub async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<(), PostError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id))?;
        if existing.author_id != author_id {
            return Err(PostError::NotAuthor);
        }

        self.repo.delete(id, author_id).await?;
        Ok(())
    }
}

/// Validate editor-submitted fields.
fn validate_draft(draft: &PostDraft) -> Result<(), PostError> {
    if draft.title.trim().is_empty() {
        return Err(PostError::validation("title must not be empty"));
    }
    if draft.content.trim().is_empty() {
        return Err(PostError::validation("content must not be empty"));
    }
    Ok(())
}
