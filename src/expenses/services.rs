use serde_json::Number;
use time::Date;
use tracing::{info, instrument, warn};

use crate::auth::repo_types::UserId;
use crate::error::{AppError, AppResult};
use crate::expenses::dto::{CreateExpenseRequest, ExpenseDetails, ExpenseListItem, UpdateExpenseRequest};
use crate::expenses::repo::ExpenseStore;
use crate::expenses::repo_types::{ExpenseChanges, ExpenseId, NewExpense};
use crate::repo::OwnedWrite;
use crate::validation::{
    amount_present, iso_date, positive_amount, present, INVALID_AMOUNT, INVALID_DATE,
    MISSING_FIELDS,
};

pub const NOT_OWNED: &str = "Not authorized to modify this expense.";

struct ExpenseFields {
    description: String,
    amount: i64,
    date: Date,
}

/// Presence first, then amount, then date shape.
fn validate_fields(
    description: Option<&str>,
    amount: Option<&Number>,
    date: Option<&str>,
) -> AppResult<ExpenseFields> {
    let (Some(description), Some(amount), Some(date)) = (
        present(description),
        amount.filter(|_| amount_present(amount)),
        present(date),
    ) else {
        return Err(AppError::validation(MISSING_FIELDS));
    };

    let amount = positive_amount(amount).ok_or_else(|| AppError::validation(INVALID_AMOUNT))?;
    let date = iso_date(date).ok_or_else(|| AppError::validation(INVALID_DATE))?;

    Ok(ExpenseFields {
        description: description.to_string(),
        amount,
        date,
    })
}

fn no_match(id: ExpenseId) -> AppError {
    AppError::not_found(format!("There's no match for the ID: {id}"))
}

#[instrument(skip(store))]
pub async fn list<S>(store: &S, user_id: UserId) -> AppResult<Vec<ExpenseListItem>>
where
    S: ExpenseStore + ?Sized,
{
    let rows = store.list_expenses(user_id).await?;
    Ok(rows.into_iter().map(ExpenseListItem::from).collect())
}

#[instrument(skip(store, req))]
pub async fn create<S>(store: &S, user_id: UserId, mut req: CreateExpenseRequest) -> AppResult<()>
where
    S: ExpenseStore + ?Sized,
{
    let fields = validate_fields(req.description.as_deref(), req.amount.as_ref(), req.date.as_deref())
        .inspect_err(|e| warn!(reason = %e, "expense rejected"))?;

    let expense = NewExpense {
        description: fields.description,
        amount: fields.amount,
        date: fields.date,
        entry_type: req.entry_type(),
    };
    store.insert_expense(user_id, &expense).await?;
    info!(amount = expense.amount, "expense added");
    Ok(())
}

#[instrument(skip(store))]
pub async fn get<S>(store: &S, user_id: UserId, id: ExpenseId) -> AppResult<ExpenseDetails>
where
    S: ExpenseStore + ?Sized,
{
    match store.find_expense(user_id, id).await? {
        Some(expense) => Ok(expense.into()),
        None => Err(AppError::not_found(format!(
            "No expense found for ID {id} or not authorized"
        ))),
    }
}

#[instrument(skip(store, req))]
pub async fn update<S>(
    store: &S,
    user_id: UserId,
    id: ExpenseId,
    req: UpdateExpenseRequest,
) -> AppResult<()>
where
    S: ExpenseStore + ?Sized,
{
    let fields = validate_fields(req.description.as_deref(), req.amount.as_ref(), req.date.as_deref())
        .inspect_err(|e| warn!(reason = %e, "expense update rejected"))?;

    let changes = ExpenseChanges {
        description: fields.description,
        amount: fields.amount,
        date: fields.date,
    };
    match store.update_expense(user_id, id, &changes).await? {
        OwnedWrite::Done => {
            info!("expense modified");
            Ok(())
        }
        OwnedWrite::NotOwned => {
            warn!("update of unowned expense");
            Err(AppError::Forbidden(NOT_OWNED.into()))
        }
        OwnedWrite::Missing => Err(no_match(id)),
    }
}

#[instrument(skip(store))]
pub async fn delete<S>(store: &S, user_id: UserId, id: ExpenseId) -> AppResult<()>
where
    S: ExpenseStore + ?Sized,
{
    match store.delete_expense(user_id, id).await? {
        OwnedWrite::Done => {
            info!("expense deleted");
            Ok(())
        }
        OwnedWrite::NotOwned => {
            warn!("delete of unowned expense");
            Err(AppError::Forbidden(NOT_OWNED.into()))
        }
        OwnedWrite::Missing => Err(no_match(id)),
    }
}
