//! Coercion of loosely-typed request values.
//!
//! Clients send amounts as numbers, numeric strings, or not at all, and text
//! fields occasionally as numbers (phone numbers mostly). Bad input degrades
//! to a default instead of failing the request; only numbers too large to be
//! money are refused.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::error::LedgerError;

/// Largest magnitude accepted for a single monetary value: 10^15.
pub const MAX_MONEY: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Decimal places kept for every monetary value.
pub const MONEY_SCALE: u32 = 2;

/// Rounds a monetary value to [`MONEY_SCALE`] places, halves away from zero.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Coerces a raw JSON value into a monetary amount.
///
/// Missing, `null`, empty, and non-numeric values become zero. Numeric strings
/// are parsed (surrounding whitespace ignored), booleans count as 0 or 1.
///
/// # Errors
///
/// Returns `AmountOutOfRange` for numbers whose magnitude exceeds [`MAX_MONEY`].
pub fn amount(value: Option<&Value>) -> Result<Decimal, LedgerError> {
    let text = match value {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Bool(true)) => return Ok(Decimal::ONE),
        _ => return Ok(Decimal::ZERO),
    };

    match parse_decimal(&text) {
        Some(parsed) => bounded_money(round_money(parsed), &text),
        None if exceeds_decimal(&text) => Err(LedgerError::AmountOutOfRange(text)),
        None => Ok(Decimal::ZERO),
    }
}

/// Checks a computed monetary value against [`MAX_MONEY`].
///
/// # Errors
///
/// Returns `AmountOutOfRange` when the magnitude is too large.
pub fn bounded_money(value: Decimal, raw: &str) -> Result<Decimal, LedgerError> {
    if value.abs() > MAX_MONEY {
        Err(LedgerError::AmountOutOfRange(raw.to_string()))
    } else {
        Ok(value)
    }
}

/// Returns the value as text if it is "truthy", otherwise the fallback.
///
/// Non-empty strings are kept as-is, non-zero numbers are rendered. Anything
/// else (missing, `null`, `""`, `0`, booleans, arrays, objects) falls back.
#[must_use]
pub fn text_or(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => {
            let rendered = n.to_string();
            if parse_decimal(&rendered).is_some_and(|d| d.is_zero()) {
                fallback.to_string()
            } else {
                rendered
            }
        }
        _ => fallback.to_string(),
    }
}

/// Returns `Some` only for strings that contain something other than whitespace.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Serde helper: accepts a string, number, or boolean as optional text.
///
/// `null` and structured values deserialize as `None`.
pub fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// A number `Decimal` cannot hold, as opposed to text that is not a number.
///
/// Values that only fail on precision (`1e-40`) round to zero and are not
/// reported.
fn exceeds_decimal(s: &str) -> bool {
    s.parse::<f64>()
        .is_ok_and(|f| f.is_finite() && f.abs() >= 1.0)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
