//! Ledger error types.

use nsgd_shared::AppError;
use thiserror::Error;

use crate::export::ExportError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No entry is stored under the key.
    #[error("Entry not found")]
    EntryNotFound(String),

    /// No expense is stored under the id.
    #[error("Expense not found")]
    ExpenseNotFound(String),

    /// A monetary value, given or derived, is too large to be stored.
    #[error("Amount out of range")]
    AmountOutOfRange(String),

    /// Every generated key collided with an existing entry.
    #[error("Could not generate a free entry id after {0} attempts")]
    IdExhausted(u32),

    /// The backing store failed.
    #[error("Repository error: {0}")]
    Repository(String),

    /// Workbook generation failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl LedgerError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl std::fmt::Display) -> Self {
        Self::Repository(msg.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::EntryNotFound(_) | LedgerError::ExpenseNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            LedgerError::AmountOutOfRange(_) => Self::Validation(err.to_string()),
            LedgerError::IdExhausted(_) => Self::Conflict(err.to_string()),
            LedgerError::Repository(msg) => Self::Database(msg),
            LedgerError::Export(e) => e.into(),
        }
    }
}
