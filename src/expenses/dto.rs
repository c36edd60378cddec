use serde::{Deserialize, Serialize};
use serde_json::Number;
use time::Date;

use crate::expenses::repo_types::{Expense, ExpenseId};

time::serde::format_description!(day_month_year, Date, "[day]-[month]-[year]");
time::serde::format_description!(year_month_day, Date, "[year]-[month]-[day]");

/// `amount` stays a raw JSON number so fractional values reach validation
/// instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub description: Option<String>,
    pub amount: Option<Number>,
    pub date: Option<String>,
    pub entrytype: Option<String>,
    /// Read only when `entrytype` is absent.
    #[serde(rename = "entryType")]
    pub entry_type_alias: Option<String>,
}

impl CreateExpenseRequest {
    pub fn entry_type(&mut self) -> Option<String> {
        self.entrytype.take().or_else(|| self.entry_type_alias.take())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub description: Option<String>,
    pub amount: Option<Number>,
    pub date: Option<String>,
}

/// Row in `GET /api/expenses`; dates read `DD-MM-YYYY`.
#[derive(Debug, Serialize)]
pub struct ExpenseListItem {
    pub id: ExpenseId,
    pub description: String,
    pub amount: i64,
    #[serde(with = "day_month_year")]
    pub date: Date,
    #[serde(rename = "entryType")]
    pub entry_type: Option<String>,
}

/// Single expense; dates read `YYYY-MM-DD`.
#[derive(Debug, Serialize)]
pub struct ExpenseDetails {
    pub id: ExpenseId,
    pub description: String,
    pub amount: i64,
    #[serde(with = "year_month_day")]
    pub date: Date,
    #[serde(rename = "entryType")]
    pub entry_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub expense: ExpenseDetails,
}

impl From<Expense> for ExpenseListItem {
    fn from(e: Expense) -> Self {
        Self {
            id: e.id,
            description: e.description,
            amount: e.amount,
            date: e.date,
            entry_type: e.entry_type,
        }
    }
}

impl From<Expense> for ExpenseDetails {
    fn from(e: Expense) -> Self {
        Self {
            id: e.id,
            description: e.description,
            amount: e.amount,
            date: e.date,
            entry_type: e.entry_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    fn expense() -> Expense {
        Expense {
            id: 7,
            user_id: 1,
            description: "coffee".into(),
            amount: 5,
            date: date!(2024 - 01 - 09),
            entry_type: Some("food".into()),
        }
    }

    #[test]
    fn list_item_uses_day_first_dates() {
        let item = ExpenseListItem::from(expense());
        assert_eq!(
            serde_json::to_value(item).unwrap(),
            json!({"id": 7, "description": "coffee", "amount": 5, "date": "09-01-2024", "entryType": "food"})
        );
    }

    #[test]
    fn details_use_iso_dates_inside_envelope() {
        let res = ExpenseResponse { expense: expense().into() };
        let value = serde_json::to_value(res).unwrap();
        assert_eq!(value["expense"]["date"], "2024-01-09");
        assert_eq!(value["expense"]["entryType"], "food");
        assert!(value["expense"].get("user_id").is_none());
    }

    #[test]
    fn create_request_accepts_both_entry_type_spellings() {
        let mut a: CreateExpenseRequest = serde_json::from_value(json!({"entrytype": "food"})).unwrap();
        let mut b: CreateExpenseRequest = serde_json::from_value(json!({"entryType": "food"})).unwrap();
        assert_eq!(a.entry_type().as_deref(), Some("food"));
        assert_eq!(b.entry_type().as_deref(), Some("food"));
    }

    #[test]
    fn lowercase_entry_type_wins_when_both_are_sent() {
        let mut req: CreateExpenseRequest =
            serde_json::from_value(json!({"entrytype": "food", "entryType": "rent"})).unwrap();
        assert_eq!(req.entry_type().as_deref(), Some("food"));
    }

    #[test]
    fn string_amounts_fail_to_deserialize() {
        let res = serde_json::from_value::<CreateExpenseRequest>(json!({"amount": "5"}));
        assert!(res.is_err());
    }
}
