//! Customer ledger: entries, their payment histories and standalone expenses.
//!
//! This module implements the core ledger functionality:
//! - Coercion of loosely-typed client values
//! - Payment normalization and totals aggregation
//! - Entry reconciliation (merge policy table)
//! - Expenses
//! - Ledger service over a pluggable store

pub mod coerce;
pub mod entry;
pub mod error;
pub mod expense;
pub mod payment;
pub mod reconcile;
pub mod service;
pub mod totals;

#[cfg(test)]
mod payment_props;
#[cfg(test)]
mod totals_props;

pub use entry::{Entry, EntryDraft, UNIQUE_ID_PREFIX, generate_unique_id};
pub use error::LedgerError;
pub use expense::{Expense, ExpenseDraft, NewExpense};
pub use payment::{DEFAULT_MODE, Payment, normalize_payments};
pub use reconcile::{FieldPolicy, FieldRule, POLICIES, reconcile_history, reconcile_save};
pub use service::{LedgerService, LedgerStore, MAX_ID_ATTEMPTS};
pub use totals::{Totals, aggregate};

/// Date format used throughout the ledger.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Today's date in [`DATE_FORMAT`], local time.
#[must_use]
pub fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}
