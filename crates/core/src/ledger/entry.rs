//! Customer ledger entries.

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce;
use super::payment::Payment;
use super::totals::Totals;

/// Prefix of every generated entry id.
pub const UNIQUE_ID_PREFIX: &str = "NSGD-";

/// A customer ledger record: what is owed, what was paid, and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// External identity key.
    #[serde(rename = "uniqueID")]
    pub unique_id: String,
    /// Entry date (`DD/MM/YYYY`).
    pub date: String,
    /// Customer name.
    pub name: String,
    /// Customer contact.
    pub contact: String,
    /// Agent who brought the customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Agent contact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_phone: Option<String>,
    /// Stated total owed.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Derived: sum of payments received.
    #[serde(with = "rust_decimal::serde::float")]
    pub paid: Decimal,
    /// Derived: sum of costs incurred.
    #[serde(with = "rust_decimal::serde::float")]
    pub expenditure: Decimal,
    /// Derived: `amount - paid`.
    #[serde(with = "rust_decimal::serde::float")]
    pub due: Decimal,
    /// Derived: `paid - expenditure`.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// Payment history, oldest first.
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl Entry {
    /// Overwrites the derived figures.
    pub const fn apply_totals(&mut self, totals: Totals) {
        self.paid = totals.paid;
        self.expenditure = totals.expenditure;
        self.due = totals.due;
        self.balance = totals.balance;
    }
}

/// A save request as the client sends it: everything optional, loosely typed.
///
/// Derived fields (`paid`, `due`, ...) and unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    /// Identity key; blank means "generate one".
    #[serde(rename = "uniqueID", default, deserialize_with = "coerce::loose_text")]
    pub unique_id: Option<String>,
    /// Entry date.
    #[serde(default, deserialize_with = "coerce::loose_text")]
    pub date: Option<String>,
    /// Customer name.
    #[serde(default, deserialize_with = "coerce::loose_text")]
    pub name: Option<String>,
    /// Alternate customer name field used by older clients.
    #[serde(default, deserialize_with = "coerce::loose_text")]
    pub customer_name: Option<String>,
    /// Alternate customer name field used by older clients.
    #[serde(default, deserialize_with = "coerce::loose_text")]
    pub customer: Option<String>,
    /// Customer contact.
    #[serde(default, deserialize_with = "coerce::loose_text")]
    pub contact: Option<String>,
    /// Alternate contact field used by older clients.
    #[serde(default, deserialize_with = "coerce::loose_text")]
    pub phone: Option<String>,
    /// Agent name.
    #[serde(default, deserialize_with = "coerce::loose_text")]
    pub agent: Option<String>,
    /// Agent contact.
    #[serde(default, deserialize_with = "coerce::loose_text")]
    pub agent_phone: Option<String>,
    /// Stated total owed, any JSON shape.
    #[serde(default)]
    pub amount: Option<Value>,
    /// Payment history, any JSON shape.
    #[serde(default)]
    pub payments: Option<Value>,
}

impl EntryDraft {
    /// The identity key, if the client supplied a non-blank one.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        coerce::non_blank(self.unique_id.as_deref())
    }
}

/// Generates a candidate entry id of the form `NSGD-NNNNN`.
pub fn generate_unique_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{UNIQUE_ID_PREFIX}{}", rng.random_range(10_000..=99_999))
}
