use async_trait::async_trait;

use crate::auth::repo_types::UserId;
use crate::db::PgStore;
use crate::repo::StoreError;

/// Categories are plain names, unique per user.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_categories(&self, user_id: UserId) -> Result<Vec<String>, StoreError>;

    /// `UniqueViolation` when the user already has that name.
    async fn insert_category(&self, user_id: UserId, category: &str) -> Result<(), StoreError>;

    /// Returns the number of renamed rows; `UniqueViolation` if `new_name` is taken.
    async fn rename_category(
        &self,
        user_id: UserId,
        old_name: &str,
        new_name: &str,
    ) -> Result<u64, StoreError>;

    /// Returns the number of deleted rows.
    async fn delete_category(&self, user_id: UserId, category: &str) -> Result<u64, StoreError>;
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn list_categories(&self, user_id: UserId) -> Result<Vec<String>, StoreError> {
        let names = sqlx::query_scalar::<_, String>("SELECT category FROM categories WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    async fn insert_category(&self, user_id: UserId, category: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO categories (category, user_id) VALUES ($1, $2)")
            .bind(category)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_write)?;
        Ok(())
    }

    async fn rename_category(
        &self,
        user_id: UserId,
        old_name: &str,
        new_name: &str,
    ) -> Result<u64, StoreError> {
        let done = sqlx::query("UPDATE categories SET category = $1 WHERE category = $2 AND user_id = $3")
            .bind(new_name)
            .bind(old_name)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_write)?;
        Ok(done.rows_affected())
    }

    async fn delete_category(&self, user_id: UserId, category: &str) -> Result<u64, StoreError> {
        let done = sqlx::query("DELETE FROM categories WHERE category = $1 AND user_id = $2")
            .bind(category)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::UserStore;
    use sqlx::PgPool;

    async fn user(store: &PgStore, name: &str) -> UserId {
        store
            .create_user_with_session(name, &format!("{name}@example.com"), "hash", name)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn insert_and_rename_conflicts_are_unique_violations(pool: PgPool) {
        let store = PgStore::from_pool(pool);
        let ana = user(&store, "ana").await;
        store.insert_category(ana, "food").await.unwrap();
        store.insert_category(ana, "rent").await.unwrap();

        let err = store.insert_category(ana, "food").await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));

        let err = store.rename_category(ana, "food", "rent").await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));

        let mut names = store.list_categories(ana).await.unwrap();
        names.sort();
        assert_eq!(names, vec!["food", "rent"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn writes_only_touch_the_owners_rows(pool: PgPool) {
        let store = PgStore::from_pool(pool);
        let ana = user(&store, "ana").await;
        let bob = user(&store, "bob").await;
        store.insert_category(ana, "food").await.unwrap();
        store.insert_category(bob, "food").await.unwrap();

        assert_eq!(store.rename_category(bob, "food", "groceries").await.unwrap(), 1);
        assert_eq!(store.rename_category(bob, "missing", "x").await.unwrap(), 0);
        assert_eq!(store.delete_category(bob, "rent").await.unwrap(), 0);

        assert_eq!(store.list_categories(ana).await.unwrap(), vec!["food"]);
        assert_eq!(store.list_categories(bob).await.unwrap(), vec!["groceries"]);
    }
}
