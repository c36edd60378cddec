use tracing::{debug, info, instrument, warn};

use crate::auth::repo_types::UserId;
use crate::categories::repo::CategoryStore;
use crate::error::{AppError, AppResult};
use crate::repo::StoreError;
use crate::validation::present;

pub const MISSING_NAME: &str = "Missing category name.";
pub const MISSING_NEW_NAME: &str = "Missing new name.";
pub const DUPLICATE: &str = "That category already exists.";
pub const NOT_FOUND: &str = "Category not found or not authorized.";

fn conflict_or(e: StoreError) -> AppError {
    match e {
        StoreError::UniqueViolation => AppError::Conflict(DUPLICATE.into()),
        other => other.into(),
    }
}

#[instrument(skip(store))]
pub async fn list<S>(store: &S, user_id: UserId) -> AppResult<Vec<String>>
where
    S: CategoryStore + ?Sized,
{
    Ok(store.list_categories(user_id).await?)
}

/// Duplicates are caught from the unique constraint, not checked up front.
#[instrument(skip(store))]
pub async fn create<S>(store: &S, user_id: UserId, category: Option<&str>) -> AppResult<()>
where
    S: CategoryStore + ?Sized,
{
    let Some(category) = present(category) else {
        warn!("category name missing");
        return Err(AppError::validation(MISSING_NAME));
    };

    store
        .insert_category(user_id, category)
        .await
        .map_err(conflict_or)
        .inspect_err(|e| warn!(reason = %e, "category rejected"))?;
    info!(%category, "category added");
    Ok(())
}

#[instrument(skip(store))]
pub async fn rename<S>(
    store: &S,
    user_id: UserId,
    old_name: &str,
    new_name: Option<&str>,
) -> AppResult<()>
where
    S: CategoryStore + ?Sized,
{
    let Some(new_name) = present(new_name) else {
        warn!("new category name missing");
        return Err(AppError::validation(MISSING_NEW_NAME));
    };

    let renamed = store
        .rename_category(user_id, old_name, new_name)
        .await
        .map_err(conflict_or)?;
    if renamed == 0 {
        return Err(AppError::not_found(NOT_FOUND));
    }
    info!(%old_name, %new_name, "category renamed");
    Ok(())
}

/// Succeeds whether or not the name existed.
#[instrument(skip(store))]
pub async fn delete<S>(store: &S, user_id: UserId, category: &str) -> AppResult<()>
where
    S: CategoryStore + ?Sized,
{
    let deleted = store.delete_category(user_id, category).await?;
    debug!(deleted, "category delete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn create_rename_delete_round_trip() {
        let store = MemoryStore::default();
        create(&store, 1, Some("food")).await.unwrap();
        assert_eq!(list(&store, 1).await.unwrap(), vec!["food"]);

        rename(&store, 1, "food", Some("groceries")).await.unwrap();
        assert_eq!(list(&store, 1).await.unwrap(), vec!["groceries"]);

        delete(&store, 1, "groceries").await.unwrap();
        assert!(list(&store, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_names_conflict_per_user_only() {
        let store = MemoryStore::default();
        create(&store, 1, Some("food")).await.unwrap();

        let err = create(&store, 1, Some("food")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(list(&store, 1).await.unwrap().len(), 1);

        create(&store, 2, Some("food")).await.unwrap();
    }

    #[tokio::test]
    async fn empty_names_are_rejected() {
        let store = MemoryStore::default();
        assert_eq!(create(&store, 1, Some("")).await.unwrap_err().status(), StatusCode::BAD_REQUEST);
        assert_eq!(create(&store, 1, None).await.unwrap_err().status(), StatusCode::BAD_REQUEST);
        let err = rename(&store, 1, "food", None).await.unwrap_err();
        assert_eq!(err.to_string(), MISSING_NEW_NAME);
    }

    #[tokio::test]
    async fn rename_of_someone_elses_category_is_not_found() {
        let store = MemoryStore::default();
        create(&store, 1, Some("food")).await.unwrap();

        let err = rename(&store, 2, "food", Some("mine")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(list(&store, 1).await.unwrap(), vec!["food"]);
    }

    #[tokio::test]
    async fn rename_onto_existing_name_conflicts() {
        let store = MemoryStore::default();
        create(&store, 1, Some("food")).await.unwrap();
        create(&store, 1, Some("rent")).await.unwrap();

        let err = rename(&store, 1, "food", Some("rent")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_scoped_to_owner() {
        let store = MemoryStore::default();
        create(&store, 1, Some("food")).await.unwrap();

        delete(&store, 2, "food").await.unwrap();
        delete(&store, 1, "missing").await.unwrap();
        assert_eq!(list(&store, 1).await.unwrap(), vec!["food"]);
    }
}
