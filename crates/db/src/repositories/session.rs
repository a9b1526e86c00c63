//! Refresh-token sessions.
//!
//! A session row backs every refresh token. Only a SHA-256 digest of the
//! token is stored, so a leaked table never yields usable tokens; lookups
//! recompute the digest from the presented token.

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entities::sessions;

/// Hex SHA-256 digest of a refresh token, as stored in the table.
#[must_use]
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Repository over the `sessions` table.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a session for a freshly issued refresh token.
    ///
    /// `ttl` matches the refresh token's lifetime; the row expires with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn open(
        &self,
        user_id: Uuid,
        refresh_token: &str,
        ttl: Duration,
        user_agent: Option<&str>,
    ) -> Result<sessions::Model, DbErr> {
        let now = Utc::now();
        sessions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token_digest: Set(token_digest(refresh_token)),
            user_agent: Set(user_agent.map(String::from)),
            expires_at: Set((now + ttl).into()),
            revoked_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
    }

    /// Finds the live session behind a refresh token.
    ///
    /// Revoked and expired sessions are filtered out in the query, so a
    /// `Some` result is always usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_live(&self, refresh_token: &str) -> Result<Option<sessions::Model>, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::TokenDigest.eq(token_digest(refresh_token)))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
    }

    /// Revokes a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn revoke(&self, id: Uuid) -> Result<(), DbErr> {
        let now = Utc::now().into();
        sessions::ActiveModel {
            id: Set(id),
            revoked_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(())
    }

    /// Revokes the session behind a refresh token; returns whether one was
    /// live.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or update fails.
    pub async fn revoke_token(&self, refresh_token: &str) -> Result<bool, DbErr> {
        match self.find_live(refresh_token).await? {
            Some(session) => {
                self.revoke(session.id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Revokes every live session of a user; returns how many were revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, DbErr> {
        let now = Utc::now();
        let result = sessions::Entity::update_many()
            .col_expr(
                sessions::Column::RevokedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .col_expr(
                sessions::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Deletes expired session rows; returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn purge_expired(&self) -> Result<u64, DbErr> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lt(Utc::now()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
