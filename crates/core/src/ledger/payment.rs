//! Payment records and their normalization.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce;
use super::error::LedgerError;

/// Payment channel used when the client does not name one.
pub const DEFAULT_MODE: &str = "Cash";

/// One line of an entry's payment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Day the payment was recorded (`DD/MM/YYYY`).
    pub date: String,
    /// Amount received.
    #[serde(with = "rust_decimal::serde::float")]
    pub paid: Decimal,
    /// Cost incurred against this payment.
    #[serde(with = "rust_decimal::serde::float")]
    pub expenditure: Decimal,
    /// Payment channel, e.g. "Cash".
    pub mode: String,
}

/// Normalizes a raw payments value into canonical payment records.
///
/// Anything that is not a JSON array yields an empty history. Each array
/// element maps to exactly one payment, in order; elements that are not
/// objects produce an all-defaults payment.
///
/// # Errors
///
/// Returns `AmountOutOfRange` if any payment carries an oversized amount.
pub fn normalize_payments(raw: Option<&Value>, today: &str) -> Result<Vec<Payment>, LedgerError> {
    let Some(Value::Array(items)) = raw else {
        return Ok(Vec::new());
    };

    items
        .iter()
        .map(|item| normalize_payment(item, today))
        .collect()
}

fn normalize_payment(item: &Value, today: &str) -> Result<Payment, LedgerError> {
    Ok(Payment {
        date: coerce::text_or(item.get("date"), today),
        paid: coerce::amount(item.get("paid"))?,
        expenditure: coerce::amount(item.get("expenditure"))?,
        mode: coerce::text_or(item.get("mode"), DEFAULT_MODE),
    })
}
