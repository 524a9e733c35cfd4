//! Derived totals of an entry.
//!
//! These four figures are never accepted from a client; every write path
//! recomputes them from the payment history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::coerce::bounded_money;
use super::error::LedgerError;
use super::payment::Payment;

/// Figures derived from an entry's payments and stated amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of `payment.paid`.
    pub paid: Decimal,
    /// Sum of `payment.expenditure`.
    pub expenditure: Decimal,
    /// `amount - paid`.
    pub due: Decimal,
    /// `paid - expenditure`.
    pub balance: Decimal,
}

/// Aggregates a normalized payment history against the stated amount.
///
/// # Errors
///
/// Returns `AmountOutOfRange` if a sum or difference leaves the money range.
pub fn aggregate(payments: &[Payment], amount: Decimal) -> Result<Totals, LedgerError> {
    let paid = sum(payments.iter().map(|p| p.paid), "paid")?;
    let expenditure = sum(payments.iter().map(|p| p.expenditure), "expenditure")?;

    Ok(Totals {
        paid,
        expenditure,
        due: checked(amount.checked_sub(paid), "due")?,
        balance: checked(paid.checked_sub(expenditure), "balance")?,
    })
}

fn sum(mut values: impl Iterator<Item = Decimal>, field: &str) -> Result<Decimal, LedgerError> {
    values.try_fold(Decimal::ZERO, |acc, value| checked(acc.checked_add(value), field))
}

fn checked(value: Option<Decimal>, field: &str) -> Result<Decimal, LedgerError> {
    value
        .ok_or_else(|| LedgerError::AmountOutOfRange(field.to_string()))
        .and_then(|v| bounded_money(v, field))
}
