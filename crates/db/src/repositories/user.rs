//! Account lookups and registration.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::users;

/// Fields of a new account; the password arrives already hashed.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    /// Account email, unique across users.
    pub email: &'a str,
    /// Argon2id hash of the password.
    pub password_hash: &'a str,
    /// Display name.
    pub full_name: &'a str,
}

/// Repository over the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Looks up an account by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Looks up an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Whether an email already belongs to an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn is_email_taken(&self, email: &str) -> Result<bool, DbErr> {
        self.find_by_email(email).await.map(|user| user.is_some())
    }

    /// Inserts a new account and returns its row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including a concurrent
    /// registration hitting the email unique constraint).
    pub async fn register(&self, new_user: NewUser<'_>) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email.to_string()),
            password_hash: Set(new_user.password_hash.to_string()),
            full_name: Set(new_user.full_name.to_string()),
            avatar_url: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }
}
