//! Standalone expenses. Not tied to any entry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce;
use super::error::LedgerError;

/// A stored expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Store-assigned identifier.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Day of the expense (`DD/MM/YYYY`).
    pub date: String,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Amount spent.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// An expense as the client posts it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseDraft {
    /// Day of the expense; defaults to today.
    #[serde(default, deserialize_with = "coerce::loose_text")]
    pub date: Option<String>,
    /// Free-form note.
    #[serde(default, deserialize_with = "coerce::loose_text")]
    pub description: Option<String>,
    /// Amount, any JSON shape.
    #[serde(default)]
    pub amount: Option<Value>,
}

/// A normalized expense ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    /// Day of the expense.
    pub date: String,
    /// Free-form note.
    pub description: Option<String>,
    /// Amount spent.
    pub amount: Decimal,
}

impl NewExpense {
    /// Applies defaults and coercion to a client draft.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` for an oversized amount.
    pub fn from_draft(draft: ExpenseDraft, today: &str) -> Result<Self, LedgerError> {
        let date = match draft.date {
            Some(date) if !date.is_empty() => date,
            _ => today.to_string(),
        };

        Ok(Self {
            date,
            description: draft.description,
            amount: coerce::amount(draft.amount.as_ref())?,
        })
    }

    /// Attaches the store-assigned id.
    #[must_use]
    pub fn with_id(self, id: impl Into<String>) -> Expense {
        Expense {
            id: id.into(),
            date: self.date,
            description: self.description,
            amount: self.amount,
        }
    }
}
