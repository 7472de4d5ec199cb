//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;

use pixel_exchange_core::format_amount;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a decimal amount as baht (`1245` → `฿1,245`, `0` → `Free`).
///
/// Values that do not parse as a decimal pass through unchanged.
///
/// Usage in templates: `{{ cart.subtotal|baht }}`
#[askama::filter_fn]
pub fn baht(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(Decimal::from_str(&raw).map_or(raw, |amount| {
        if amount.is_zero() {
            "Free".to_owned()
        } else {
            format!("฿{}", format_amount(amount))
        }
    }))
}
