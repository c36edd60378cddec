use serde::Serialize;
use sqlx::FromRow;
use time::Date;

use crate::auth::repo_types::UserId;

pub type ExpenseId = i64;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: ExpenseId,
    pub user_id: UserId,
    pub description: String,
    pub amount: i64,
    pub date: Date,
    #[sqlx(rename = "entrytype")]
    pub entry_type: Option<String>,
}

/// Validated fields of a new expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: i64,
    pub date: Date,
    pub entry_type: Option<String>,
}

/// Full replacement of the editable fields. `entry_type` is not editable.
#[derive(Debug, Clone)]
pub struct ExpenseChanges {
    pub description: String,
    pub amount: i64,
    pub date: Date,
}
