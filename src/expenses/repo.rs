use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use crate::auth::repo_types::UserId;
use crate::db::PgStore;
use crate::expenses::repo_types::{Expense, ExpenseChanges, ExpenseId, NewExpense};
use crate::repo::{OwnedWrite, StoreError};

/// Every query is filtered by the owning user.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// In storage order; no sorting is applied.
    async fn list_expenses(&self, user_id: UserId) -> Result<Vec<Expense>, StoreError>;

    async fn insert_expense(&self, user_id: UserId, expense: &NewExpense) -> Result<(), StoreError>;

    async fn find_expense(&self, user_id: UserId, id: ExpenseId) -> Result<Option<Expense>, StoreError>;

    /// Ownership check and update in one transaction; zero rows updated rolls back.
    async fn update_expense(
        &self,
        user_id: UserId,
        id: ExpenseId,
        changes: &ExpenseChanges,
    ) -> Result<OwnedWrite, StoreError>;

    /// Ownership check and delete in one transaction; zero rows deleted rolls back.
    async fn delete_expense(&self, user_id: UserId, id: ExpenseId) -> Result<OwnedWrite, StoreError>;
}

#[async_trait]
impl ExpenseStore for PgStore {
    async fn list_expenses(&self, user_id: UserId) -> Result<Vec<Expense>, StoreError> {
        let rows = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, user_id, description, amount, date, entrytype
            FROM expenses
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_expense(&self, user_id: UserId, expense: &NewExpense) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO expenses (user_id, description, amount, date, entrytype)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(expense.date)
        .bind(expense.entry_type.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_expense(&self, user_id: UserId, id: ExpenseId) -> Result<Option<Expense>, StoreError> {
        let row = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, user_id, description, amount, date, entrytype
            FROM expenses
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_expense(
        &self,
        user_id: UserId,
        id: ExpenseId,
        changes: &ExpenseChanges,
    ) -> Result<OwnedWrite, StoreError> {
        let mut tx = self.pool.begin().await?;

        if let Some(outcome) = ownership_check(&mut tx, user_id, id).await? {
            tx.rollback().await?;
            return Ok(outcome);
        }

        let done = sqlx::query(
            r#"
            UPDATE expenses
            SET description = $1, amount = $2, date = $3
            WHERE id = $4 AND user_id = $5
            "#,
        )
        .bind(&changes.description)
        .bind(changes.amount)
        .bind(changes.date)
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        if done.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(OwnedWrite::Missing);
        }

        tx.commit().await?;
        Ok(OwnedWrite::Done)
    }

    async fn delete_expense(&self, user_id: UserId, id: ExpenseId) -> Result<OwnedWrite, StoreError> {
        let mut tx = self.pool.begin().await?;

        if let Some(outcome) = ownership_check(&mut tx, user_id, id).await? {
            tx.rollback().await?;
            return Ok(outcome);
        }

        let done = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        if done.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(OwnedWrite::Missing);
        }

        tx.commit().await?;
        Ok(OwnedWrite::Done)
    }
}

/// Lock the row and compare its owner. `None` means the caller may proceed.
async fn ownership_check(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
    id: ExpenseId,
) -> Result<Option<OwnedWrite>, StoreError> {
    let owner = sqlx::query_scalar::<_, UserId>("SELECT user_id FROM expenses WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(match owner {
        None => Some(OwnedWrite::Missing),
        Some(owner) if owner != user_id => Some(OwnedWrite::NotOwned),
        Some(_) => None,
    })
}
