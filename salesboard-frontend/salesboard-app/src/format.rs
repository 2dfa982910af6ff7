//! Display helpers for Chilean peso amounts, dates and labels.

use chrono::{DateTime, NaiveDate, Utc};
use salesboard_api_types::{PaymentMethod, UserRole, UserStatus};
use thousands::{policies::DOT_SEPARATOR, Separable};

use crate::error::FormError;

/// `1234567` as `1.234.567`
pub fn format_number(value: u64) -> String {
    value.separate_by_policy(DOT_SEPARATOR)
}

/// `125000` as `$125.000`
pub fn format_clp(amount: u64) -> String {
    format!("${}", format_number(amount))
}

/// Signed, one decimal: `+12.5%`, `-3.0%`.
pub fn format_percent(change: f64) -> String {
    format!("{change:+.1}%")
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%d-%m-%Y %H:%M").to_string()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Re-renders whatever was typed into the amount field: non-digits are dropped
/// and the rest is grouped, `12a5000` becomes `125.000`.
pub fn format_amount_input(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .skip_while(|c| *c == '0')
        .collect();
    if digits.is_empty() {
        // keep a typed zero visible so it can be rejected on submit
        return if raw.contains('0') { "0".to_string() } else { String::new() };
    }
    digits.separate_by_policy(DOT_SEPARATOR)
}

/// Largest amount the form takes, 2^53 - 1, the last integer a browser number holds exactly.
pub const MAX_AMOUNT: u64 = 9_007_199_254_740_991;

/// `Ok(None)` for an empty field.
pub fn parse_amount_input(raw: &str) -> Result<Option<u64>, FormError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Ok(None);
    }
    match digits.parse::<u64>() {
        Ok(amount) if amount <= MAX_AMOUNT => Ok(Some(amount)),
        _ => Err(FormError::AmountTooLarge),
    }
}

pub fn payment_method_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cash => "Cash",
        PaymentMethod::Debit => "Debit card",
        PaymentMethod::Credit => "Credit card",
    }
}

pub fn role_label(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "Administrator",
        UserRole::Seller => "Seller",
        UserRole::Supervisor => "Supervisor",
        UserRole::Accountant => "Accountant",
    }
}

pub fn status_label(status: UserStatus) -> &'static str {
    match status {
        UserStatus::Active => "Active",
        UserStatus::Inactive => "Inactive",
        UserStatus::Suspended => "Suspended",
    }
}

/// Avatar fallback: first letter of up to two name parts, `María González` as `MG`.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
