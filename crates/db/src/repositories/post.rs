//! Post repository for database operations.
//!
//! Implements the core post persistence contract using SeaORM.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::posts;
use quill_core::image::ImageRefSource;
use quill_core::post::{
    CreatePostInput, ImageRefs, Post, PostError, PostRepository as PostRepoTrait, UpdatePostInput,
};

/// Post repository implementation.
#[derive(Debug, Clone)]
pub struct PostRepository {
    db: DatabaseConnection,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl PostRepoTrait for PostRepository {
    async fn create(&self, input: CreatePostInput) -> Result<Post, PostError> {
        let now = Utc::now().into();
        let active_model = posts::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            slug: Set(input.slug),
            content: Set(input.content),
            excerpt: Set(input.excerpt),
            featured_image: Set(input.featured_image),
            images: Set(images_to_json(&input.images)),
            author_id: Set(input.author_id),
            published: Set(input.published),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn update(&self, id: Uuid, input: UpdatePostInput) -> Result<Post, PostError> {
        let active_model = posts::ActiveModel {
            id: Set(id),
            title: Set(input.title),
            slug: Set(input.slug),
            content: Set(input.content),
            excerpt: Set(input.excerpt),
            featured_image: Set(input.featured_image),
            images: Set(images_to_json(&input.images)),
            published: Set(input.published),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let model = active_model
            .update(&self.db)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, PostError> {
        let model = posts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, PostError> {
        let model = posts::Entity::find()
            .filter(posts::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn list_published(&self, offset: u64, limit: u64) -> Result<(Vec<Post>, u64), PostError> {
        let query = posts::Entity::find().filter(posts::Column::Published.eq(true));

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        let models = query
            .order_by_desc(posts::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        Ok((models.into_iter().map(to_domain).collect(), total))
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, PostError> {
        let models = posts::Entity::find()
            .filter(posts::Column::AuthorId.eq(author_id))
            .order_by_desc(posts::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<bool, PostError> {
        let result = posts::Entity::delete_many()
            .filter(posts::Column::Id.eq(id))
            .filter(posts::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn image_refs_by_author(&self, author_id: Uuid) -> Result<Vec<ImageRefs>, PostError> {
        let models = posts::Entity::find()
            .filter(posts::Column::AuthorId.eq(author_id))
            .all(&self.db)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|model| ImageRefs {
                images: images_from_json(model.images.as_ref()),
                featured_image: model.featured_image,
            })
            .collect())
    }
}

impl ImageRefSource for PostRepository {
    async fn image_refs_by_author(&self, author_id: Uuid) -> Result<Vec<ImageRefs>, PostError> {
        PostRepoTrait::image_refs_by_author(self, author_id).await
    }
}

/// Convert an image URL list to its JSONB column value (absent when empty).
fn images_to_json(images: &[String]) -> Option<sea_orm::prelude::Json> {
    if images.is_empty() {
        None
    } else {
        Some(serde_json::json!(images))
    }
}

/// Convert a JSONB column value back to an image URL list.
fn images_from_json(value: Option<&sea_orm::prelude::Json>) -> Vec<String> {
    value
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

/// Convert database model to domain model.
fn to_domain(model: posts::Model) -> Post {
    let images = images_from_json(model.images.as_ref());
    Post {
        id: model.id,
        title: model.title,
        slug: model.slug,
        content: model.content,
        excerpt: model.excerpt,
        featured_image: model.featured_image,
        images,
        author_id: model.author_id,
        published: model.published,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}
