use async_trait::async_trait;
use thiserror::Error;

use crate::auth::repo::{SessionStore, UserStore};
use crate::categories::repo::CategoryStore;
use crate::expenses::repo::ExpenseStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Use only around statements whose unique violation is a client conflict.
    pub fn from_write(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation,
            _ => StoreError::Database(e),
        }
    }
}

/// Outcome of a write guarded by an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedWrite {
    /// No row has that id, or the write touched zero rows; rolled back.
    Missing,
    /// The row exists but belongs to another user; nothing was touched.
    NotOwned,
    Done,
}

/// Everything the HTTP layer needs from persistence.
#[async_trait]
pub trait Store: UserStore + SessionStore + ExpenseStore + CategoryStore + Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}
