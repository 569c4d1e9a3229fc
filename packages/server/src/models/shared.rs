use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::AppError;

/// Digits allowed after the point in a `NUMERIC(10,2)` amount.
pub const MONEY_SCALE: u32 = 2;
/// Digits allowed before the point in a `NUMERIC(10,2)` amount.
pub const MONEY_INTEGER_DIGITS: u32 = 8;

/// Plain `{message}` acknowledgement.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Notification sent successfully")]
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `%s%` with wildcards in `s` escaped.
pub fn contains_pattern(s: &str) -> String {
    format!("%{}%", escape_like(s))
}

/// Reject `value` if it does not fit a column of `max` characters.
pub fn check_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

/// Reject amounts a `NUMERIC(10,2)` column would round or refuse.
pub fn check_money(field: &str, amount: Decimal) -> Result<(), AppError> {
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(AppError::Validation(format!(
            "{field} must have at most {MONEY_SCALE} decimal places"
        )));
    }
    if amount.abs().trunc() >= Decimal::from(10i64.pow(MONEY_INTEGER_DIGITS)) {
        return Err(AppError::Validation(format!(
            "{field} must have at most {MONEY_INTEGER_DIGITS} digits before the decimal point"
        )));
    }
    Ok(())
}
