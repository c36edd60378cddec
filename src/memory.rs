//! In-process store with the same constraints as the Postgres schema.
//!
//! Each call holds the lock for its whole body, which gives the same
//! all-or-nothing behaviour as the transactions in `PgStore`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::auth::repo::{SessionStore, UserStore};
use crate::auth::repo_types::{User, UserId};
use crate::categories::repo::CategoryStore;
use crate::expenses::repo::ExpenseStore;
use crate::expenses::repo_types::{Expense, ExpenseChanges, ExpenseId, NewExpense};
use crate::repo::{OwnedWrite, Store, StoreError};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: HashMap<String, UserId>,
    expenses: Vec<Expense>,
    categories: Vec<(UserId, String)>,
    last_user_id: UserId,
    last_expense_id: ExpenseId,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }

    pub fn session_count(&self) -> usize {
        self.tables().sessions.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user_with_session(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        token: &str,
    ) -> Result<UserId, StoreError> {
        let mut t = self.tables();
        if t.users.iter().any(|u| u.username == username || u.email == email) {
            return Err(StoreError::UniqueViolation);
        }
        if t.sessions.contains_key(token) {
            return Err(StoreError::Backend("duplicate session token".into()));
        }

        t.last_user_id += 1;
        let id = t.last_user_id;
        t.users.push(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        });
        t.sessions.insert(token.to_string(), id);
        Ok(id)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert_session(&self, token: &str, user_id: UserId) -> Result<(), StoreError> {
        let mut t = self.tables();
        if t.sessions.contains_key(token) {
            return Err(StoreError::Backend("duplicate session token".into()));
        }
        t.sessions.insert(token.to_string(), user_id);
        Ok(())
    }

    async fn find_session_user(&self, token: &str) -> Result<Option<UserId>, StoreError> {
        Ok(self.tables().sessions.get(token).copied())
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn list_expenses(&self, user_id: UserId) -> Result<Vec<Expense>, StoreError> {
        Ok(self
            .tables()
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_expense(&self, user_id: UserId, expense: &NewExpense) -> Result<(), StoreError> {
        let mut t = self.tables();
        t.last_expense_id += 1;
        let id = t.last_expense_id;
        t.expenses.push(Expense {
            id,
            user_id,
            description: expense.description.clone(),
            amount: expense.amount,
            date: expense.date,
            entry_type: expense.entry_type.clone(),
        });
        Ok(())
    }

    async fn find_expense(&self, user_id: UserId, id: ExpenseId) -> Result<Option<Expense>, StoreError> {
        Ok(self
            .tables()
            .expenses
            .iter()
            .find(|e| e.id == id && e.user_id == user_id)
            .cloned())
    }

    async fn update_expense(
        &self,
        user_id: UserId,
        id: ExpenseId,
        changes: &ExpenseChanges,
    ) -> Result<OwnedWrite, StoreError> {
        let mut t = self.tables();
        let Some(row) = t.expenses.iter_mut().find(|e| e.id == id) else {
            return Ok(OwnedWrite::Missing);
        };
        if row.user_id != user_id {
            return Ok(OwnedWrite::NotOwned);
        }
        row.description = changes.description.clone();
        row.amount = changes.amount;
        row.date = changes.date;
        Ok(OwnedWrite::Done)
    }

    async fn delete_expense(&self, user_id: UserId, id: ExpenseId) -> Result<OwnedWrite, StoreError> {
        let mut t = self.tables();
        let Some(pos) = t.expenses.iter().position(|e| e.id == id) else {
            return Ok(OwnedWrite::Missing);
        };
        if t.expenses[pos].user_id != user_id {
            return Ok(OwnedWrite::NotOwned);
        }
        t.expenses.remove(pos);
        Ok(OwnedWrite::Done)
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self, user_id: UserId) -> Result<Vec<String>, StoreError> {
        Ok(self
            .tables()
            .categories
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, name)| name.clone())
            .collect())
    }

    async fn insert_category(&self, user_id: UserId, category: &str) -> Result<(), StoreError> {
        let mut t = self.tables();
        if t.categories.iter().any(|(o, n)| *o == user_id && n == category) {
            return Err(StoreError::UniqueViolation);
        }
        t.categories.push((user_id, category.to_string()));
        Ok(())
    }

    async fn rename_category(
        &self,
        user_id: UserId,
        old_name: &str,
        new_name: &str,
    ) -> Result<u64, StoreError> {
        let mut t = self.tables();
        let Some(pos) = t
            .categories
            .iter()
            .position(|(o, n)| *o == user_id && n == old_name)
        else {
            return Ok(0);
        };
        if old_name != new_name && t.categories.iter().any(|(o, n)| *o == user_id && n == new_name) {
            return Err(StoreError::UniqueViolation);
        }
        t.categories[pos].1 = new_name.to_string();
        Ok(1)
    }

    async fn delete_category(&self, user_id: UserId, category: &str) -> Result<u64, StoreError> {
        let mut t = self.tables();
        let before = t.categories.len();
        t.categories.retain(|(o, n)| !(*o == user_id && n == category));
        Ok((before - t.categories.len()) as u64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
