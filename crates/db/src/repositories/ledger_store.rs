//! [`LedgerStore`] backed by the database.

use nsgd_core::ledger::{Entry, Expense, LedgerError, LedgerStore, NewExpense};
use sea_orm::{DatabaseConnection, DbErr};
use tracing::error;

use super::entry::EntryRepository;
use super::expense::ExpenseRepository;

/// Ledger store over the `entries` and `expenses` tables.
///
/// Records are kept as JSON documents; the store converts between documents
/// and domain types.
#[derive(Debug, Clone)]
pub struct SeaLedgerStore {
    entries: EntryRepository,
    expenses: ExpenseRepository,
}

impl SeaLedgerStore {
    /// Creates a store on top of a connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            entries: EntryRepository::new(db.clone()),
            expenses: ExpenseRepository::new(db),
        }
    }
}

fn db_error(err: DbErr) -> LedgerError {
    error!(error = %err, "Ledger store query failed");
    LedgerError::repository(err)
}

fn decode<T: serde::de::DeserializeOwned>(document: &str) -> Result<T, LedgerError> {
    serde_json::from_str(document).map_err(|e| {
        error!(error = %e, "Stored ledger document is unreadable");
        LedgerError::repository(e)
    })
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, LedgerError> {
    serde_json::to_string(value).map_err(LedgerError::repository)
}

impl LedgerStore for SeaLedgerStore {
    async fn find_entry(&self, unique_id: &str) -> Result<Option<Entry>, LedgerError> {
        self.entries
            .find_by_unique_id(unique_id)
            .await
            .map_err(db_error)?
            .map(|model| decode(&model.document))
            .transpose()
    }

    async fn list_entries(&self) -> Result<Vec<Entry>, LedgerError> {
        self.entries
            .list_newest_first()
            .await
            .map_err(db_error)?
            .iter()
            .map(|model| decode(&model.document))
            .collect()
    }

    async fn upsert_entry(&self, entry: &Entry) -> Result<(), LedgerError> {
        let document = encode(entry)?;
        self.entries
            .upsert(&entry.unique_id, document)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn delete_entry(&self, unique_id: &str) -> Result<bool, LedgerError> {
        self.entries
            .delete_by_unique_id(unique_id)
            .await
            .map_err(db_error)
    }

    async fn create_expense(&self, expense: NewExpense) -> Result<Expense, LedgerError> {
        let expense = expense.with_id(ExpenseRepository::next_id());
        let document = encode(&expense)?;
        self.expenses
            .create(expense.id.clone(), document)
            .await
            .map_err(db_error)?;
        Ok(expense)
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>, LedgerError> {
        self.expenses
            .list_newest_first()
            .await
            .map_err(db_error)?
            .iter()
            .map(|model| decode(&model.document))
            .collect()
    }

    async fn delete_expense(&self, id: &str) -> Result<bool, LedgerError> {
        self.expenses.delete(id).await.map_err(db_error)
    }
}
