use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Number;
use time::{macros::format_description, Date};

pub const MISSING_FIELDS: &str = "All fields are mandatory.";
pub const INVALID_AMOUNT: &str = "The amount must be a positive number above 0.";
pub const INVALID_DATE: &str = "Date must be in format YYYY-MM-DD";

/// Empty strings count as absent.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// A zero amount is treated as absent, like any other empty field.
pub fn amount_present(amount: Option<&Number>) -> bool {
    amount.is_some_and(|n| n.as_f64() != Some(0.0))
}

/// Only whole numbers above zero are accepted; fractional amounts are rejected.
pub fn positive_amount(amount: &Number) -> Option<i64> {
    amount.as_i64().filter(|v| *v > 0)
}

pub fn iso_date(value: &str) -> Option<Date> {
    lazy_static! {
        static ref ISO_DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    }
    if !ISO_DATE_RE.is_match(value) {
        return None;
    }
    Date::parse(value, format_description!("[year]-[month]-[day]")).ok()
}
