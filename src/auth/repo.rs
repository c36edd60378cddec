use async_trait::async_trait;

use crate::auth::repo_types::{User, UserId};
use crate::db::PgStore;
use crate::repo::StoreError;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Insert the user and its first session as one unit. A duplicate username
    /// or email yields `UniqueViolation` and leaves no rows behind.
    async fn create_user_with_session(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        token: &str,
    ) -> Result<UserId, StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// A token collision is a plain database error, never `UniqueViolation`.
    async fn insert_session(&self, token: &str, user_id: UserId) -> Result<(), StoreError>;

    async fn find_session_user(&self, token: &str) -> Result<Option<UserId>, StoreError>;
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user_with_session(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        token: &str,
    ) -> Result<UserId, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_scalar::<_, UserId>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await;

        let user_id = match inserted {
            Ok(id) => id,
            Err(e) => {
                tx.rollback().await?;
                return Err(StoreError::from_write(e));
            }
        };

        if let Err(e) = sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
            .bind(token)
            .bind(user_id)
            .execute(&mut *tx)
            .await
        {
            tx.rollback().await?;
            return Err(StoreError::Database(e));
        }

        tx.commit().await?;
        Ok(user_id)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn insert_session(&self, token: &str, user_id: UserId) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_session_user(&self, token: &str) -> Result<Option<UserId>, StoreError> {
        let user_id = sqlx::query_scalar::<_, UserId>("SELECT user_id FROM sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user_id)
    }
}
