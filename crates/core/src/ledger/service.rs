//! Ledger service: reconciliation wired to the store and upload storage.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::entry::{Entry, EntryDraft, generate_unique_id};
use super::error::LedgerError;
use super::expense::{Expense, ExpenseDraft, NewExpense};
use super::reconcile::{reconcile_history, reconcile_save};
use super::today;
use crate::export::write_ledger_workbook;
use crate::storage::StorageService;

/// Attempts at drawing an unused entry id before giving up.
pub const MAX_ID_ATTEMPTS: u32 = 20;

/// Repository trait for ledger persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait LedgerStore: Send + Sync {
    /// Find an entry by its exact key.
    fn find_entry(
        &self,
        unique_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Entry>, LedgerError>> + Send;

    /// All entries, newest first.
    fn list_entries(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Entry>, LedgerError>> + Send;

    /// Insert the entry, or overwrite the one stored under the same key.
    fn upsert_entry(
        &self,
        entry: &Entry,
    ) -> impl std::future::Future<Output = Result<(), LedgerError>> + Send;

    /// Delete an entry. Returns whether it existed.
    fn delete_entry(
        &self,
        unique_id: &str,
    ) -> impl std::future::Future<Output = Result<bool, LedgerError>> + Send;

    /// Store a new expense and assign it an id.
    fn create_expense(
        &self,
        expense: NewExpense,
    ) -> impl std::future::Future<Output = Result<Expense, LedgerError>> + Send;

    /// All expenses, newest first.
    fn list_expenses(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Expense>, LedgerError>> + Send;

    /// Delete an expense. Returns whether it existed.
    fn delete_expense(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<bool, LedgerError>> + Send;
}

/// Ledger service for entries, expenses and the export.
pub struct LedgerService<S: LedgerStore> {
    store: Arc<S>,
    uploads: Arc<StorageService>,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Create a new ledger service.
    #[must_use]
    pub fn new(store: Arc<S>, uploads: Arc<StorageService>) -> Self {
        Self { store, uploads }
    }

    /// All entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_entries(&self) -> Result<Vec<Entry>, LedgerError> {
        self.store.list_entries().await
    }

    /// Saves a draft: reconciles it with the stored entry under the same key
    /// (if any), recomputes totals and persists the result.
    ///
    /// A draft without a key gets a freshly generated, unused one.
    ///
    /// # Errors
    ///
    /// Returns an error if no free key can be generated or the store fails.
    pub async fn save_entry(&self, draft: EntryDraft) -> Result<Entry, LedgerError> {
        let (unique_id, existing) = match draft.key() {
            Some(key) => (key.to_string(), self.store.find_entry(key).await?),
            None => (self.free_unique_id().await?, None),
        };

        let entry = reconcile_save(&draft, existing.as_ref(), unique_id, &today())?;
        self.store.upsert_entry(&entry).await?;

        info!(
            unique_id = %entry.unique_id,
            created = existing.is_none(),
            payments = entry.payments.len(),
            due = %entry.due,
            "Entry saved"
        );

        Ok(entry)
    }

    async fn free_unique_id(&self) -> Result<String, LedgerError> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = generate_unique_id(&mut rand::rng());
            if self.store.find_entry(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            debug!(candidate = %candidate, attempt, "Generated entry id already taken");
        }

        warn!(attempts = MAX_ID_ATTEMPTS, "Entry id space exhausted");
        Err(LedgerError::IdExhausted(MAX_ID_ATTEMPTS))
    }

    /// Replaces the payment history of an existing entry.
    ///
    /// Nothing is written when the entry does not exist.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` for an unknown key, or an error if the store fails.
    pub async fn update_history(
        &self,
        unique_id: &str,
        payments: Option<&Value>,
    ) -> Result<Entry, LedgerError> {
        let existing = self
            .store
            .find_entry(unique_id)
            .await?
            .ok_or_else(|| LedgerError::EntryNotFound(unique_id.to_string()))?;

        let entry = reconcile_history(existing, payments, &today())?;
        self.store.upsert_entry(&entry).await?;

        info!(
            unique_id = %entry.unique_id,
            payments = entry.payments.len(),
            paid = %entry.paid,
            "Payment history updated"
        );

        Ok(entry)
    }

    /// Deletes an entry together with its upload directory.
    ///
    /// The upload directory is cleaned even when no entry row exists. A failed
    /// cleanup is logged and does not change the outcome of the delete.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if there was no entry, or an error if the store fails.
    pub async fn delete_entry(&self, unique_id: &str) -> Result<(), LedgerError> {
        let found = self.store.delete_entry(unique_id).await?;
        let files = match self.uploads.remove_dir(unique_id).await {
            Ok(files) => files,
            Err(e) => {
                warn!(unique_id = %unique_id, error = %e, "Upload cleanup failed");
                0
            }
        };

        info!(unique_id = %unique_id, found, files, "Entry deleted");

        if found {
            Ok(())
        } else {
            Err(LedgerError::EntryNotFound(unique_id.to_string()))
        }
    }

    /// All expenses, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>, LedgerError> {
        self.store.list_expenses().await
    }

    /// Records a new expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn save_expense(&self, draft: ExpenseDraft) -> Result<Expense, LedgerError> {
        let expense = self
            .store
            .create_expense(NewExpense::from_draft(draft, &today())?)
            .await?;

        info!(expense_id = %expense.id, amount = %expense.amount, "Expense saved");
        Ok(expense)
    }

    /// Deletes an expense.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseNotFound` for an unknown id, or an error if the store fails.
    pub async fn delete_expense(&self, id: &str) -> Result<(), LedgerError> {
        if self.store.delete_expense(id).await? {
            info!(expense_id = %id, "Expense deleted");
            Ok(())
        } else {
            Err(LedgerError::ExpenseNotFound(id.to_string()))
        }
    }

    /// Builds the xlsx export of every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the workbook cannot be written.
    pub async fn export_workbook(&self) -> Result<Vec<u8>, LedgerError> {
        let entries = self.store.list_entries().await?;
        let bytes = write_ledger_workbook(&entries)?;

        info!(rows = entries.len(), bytes = bytes.len(), "Ledger exported");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::UNIQUE_ID_PREFIX;
    use crate::storage::{StorageConfig, StorageProvider, UploadRequest};
    use bytes::Bytes;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Mock store keeping insertion order; newest is last.
    #[derive(Default)]
    struct MockLedgerStore {
        entries: Mutex<Vec<Entry>>,
        expenses: Mutex<Vec<Expense>>,
        writes: AtomicUsize,
        next_expense_id: AtomicUsize,
    }

    impl LedgerStore for MockLedgerStore {
        async fn find_entry(&self, unique_id: &str) -> Result<Option<Entry>, LedgerError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.unique_id == unique_id)
                .cloned())
        }

        async fn list_entries(&self) -> Result<Vec<Entry>, LedgerError> {
            Ok(self.entries.lock().unwrap().iter().rev().cloned().collect())
        }

        async fn upsert_entry(&self, entry: &Entry) -> Result<(), LedgerError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut entries = self.entries.lock().unwrap();
            match entries.iter_mut().find(|e| e.unique_id == entry.unique_id) {
                Some(stored) => *stored = entry.clone(),
                None => entries.push(entry.clone()),
            }
            Ok(())
        }

        async fn delete_entry(&self, unique_id: &str) -> Result<bool, LedgerError> {
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|e| e.unique_id != unique_id);
            Ok(entries.len() != before)
        }

        async fn create_expense(&self, expense: NewExpense) -> Result<Expense, LedgerError> {
            let id = self.next_expense_id.fetch_add(1, Ordering::SeqCst);
            let expense = expense.with_id(format!("exp-{id}"));
            self.expenses.lock().unwrap().push(expense.clone());
            Ok(expense)
        }

        async fn list_expenses(&self) -> Result<Vec<Expense>, LedgerError> {
            Ok(self.expenses.lock().unwrap().iter().rev().cloned().collect())
        }

        async fn delete_expense(&self, id: &str) -> Result<bool, LedgerError> {
            let mut expenses = self.expenses.lock().unwrap();
            let before = expenses.len();
            expenses.retain(|e| e.id != id);
            Ok(expenses.len() != before)
        }
    }

    fn service() -> (TempDir, Arc<MockLedgerStore>, LedgerService<MockLedgerStore>) {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageService::from_config(StorageConfig::new(StorageProvider::local_fs(
            dir.path(),
        )))
        .unwrap();
        let store = Arc::new(MockLedgerStore::default());
        let service = LedgerService::new(Arc::clone(&store), Arc::new(storage));
        (dir, store, service)
    }

    fn draft(value: Value) -> EntryDraft {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_save_computes_totals() {
        let (_dir, _store, service) = service();

        let entry = service
            .save_entry(draft(json!({
                "uniqueID": "NSGD-1",
                "amount": 1000,
                "payments": [{ "paid": 400, "expenditure": 100 }]
            })))
            .await
            .unwrap();

        assert_eq!(entry.paid, dec!(400));
        assert_eq!(entry.expenditure, dec!(100));
        assert_eq!(entry.due, dec!(600));
        assert_eq!(entry.balance, dec!(300));
    }

    #[tokio::test]
    async fn test_save_without_key_generates_one() {
        let (_dir, store, service) = service();

        let entry = service.save_entry(draft(json!({ "name": "Asha" }))).await.unwrap();

        let digits = entry.unique_id.strip_prefix(UNIQUE_ID_PREFIX).unwrap();
        assert_eq!(digits.len(), 5);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        assert!(store.find_entry(&entry.unique_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sparse_save_keeps_sticky_fields() {
        let (_dir, _store, service) = service();
        service
            .save_entry(draft(json!({ "uniqueID": "X", "name": "Bob", "contact": "555" })))
            .await
            .unwrap();

        let updated = service.save_entry(draft(json!({ "uniqueID": "X" }))).await.unwrap();

        assert_eq!(updated.name, "Bob");
        assert_eq!(updated.contact, "555");
    }

    #[tokio::test]
    async fn test_update_history_unknown_writes_nothing() {
        let (_dir, store, service) = service();

        let err = service
            .update_history("NSGD-404", Some(&json!([{ "paid": 10 }])))
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::EntryNotFound(ref uid) if uid == "NSGD-404"));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_history_recomputes() {
        let (_dir, _store, service) = service();
        service
            .save_entry(draft(json!({ "uniqueID": "NSGD-1", "name": "Bob", "amount": 500 })))
            .await
            .unwrap();

        let entry = service
            .update_history("NSGD-1", Some(&json!([{ "paid": 200 }, { "paid": "100", "expenditure": 50 }])))
            .await
            .unwrap();

        assert_eq!(entry.name, "Bob");
        assert_eq!(entry.paid, dec!(300));
        assert_eq!(entry.due, dec!(200));
        assert_eq!(entry.balance, dec!(250));
    }

    #[tokio::test]
    async fn test_delete_then_list_and_uploads_removed() {
        let (root, _store, service) = service();
        service.save_entry(draft(json!({ "uniqueID": "NSGD-1" }))).await.unwrap();
        service.save_entry(draft(json!({ "uniqueID": "NSGD-2" }))).await.unwrap();
        service
            .uploads
            .store_upload(UploadRequest {
                uid: Some("NSGD-1".to_string()),
                filename: "receipt.png".to_string(),
                content_type: "image/png".to_string(),
                data: Bytes::from_static(b"\x89PNG"),
            })
            .await
            .unwrap();

        service.delete_entry("NSGD-1").await.unwrap();

        let keys: Vec<String> = service
            .list_entries()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.unique_id)
            .collect();
        assert_eq!(keys, vec!["NSGD-2".to_string()]);
        assert!(!root.path().join("NSGD-1").exists());
    }

    #[tokio::test]
    async fn test_delete_survives_failed_upload_cleanup() {
        // Nothing listens on port 1, so every storage call fails.
        let unreachable = StorageProvider::s3("http://127.0.0.1:1", "uploads", "key", "secret", "us-east-1");
        let storage = StorageService::from_config(StorageConfig::new(unreachable)).unwrap();
        let store = Arc::new(MockLedgerStore::default());
        let service = LedgerService::new(Arc::clone(&store), Arc::new(storage));
        service.save_entry(draft(json!({ "uniqueID": "NSGD-1" }))).await.unwrap();

        service.delete_entry("NSGD-1").await.unwrap();

        assert!(store.find_entry("NSGD-1").await.unwrap().is_none());
        assert!(matches!(
            service.delete_entry("NSGD-1").await,
            Err(LedgerError::EntryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_save_writes_nothing() {
        let (_dir, store, service) = service();
        let max = "79228162514264337593543950335";

        let err = service
            .save_entry(draft(json!({
                "uniqueID": "NSGD-1",
                "payments": [{ "paid": max }, { "paid": max }]
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::AmountOutOfRange(_)));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_entry_is_not_found() {
        let (_dir, _store, service) = service();
        let err = service.delete_entry("NSGD-404").await.unwrap_err();
        assert!(matches!(err, LedgerError::EntryNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_dir, _store, service) = service();
        for uid in ["A", "B", "C"] {
            service.save_entry(draft(json!({ "uniqueID": uid }))).await.unwrap();
        }

        let keys: Vec<String> = service
            .list_entries()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.unique_id)
            .collect();
        assert_eq!(keys, vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn test_expense_lifecycle() {
        let (_dir, _store, service) = service();

        let expense = service
            .save_expense(serde_json::from_value(json!({ "description": "Fuel", "amount": "250" })).unwrap())
            .await
            .unwrap();
        assert_eq!(expense.amount, dec!(250));
        assert_eq!(service.list_expenses().await.unwrap().len(), 1);

        service.delete_expense(&expense.id).await.unwrap();
        assert!(service.list_expenses().await.unwrap().is_empty());
        assert!(matches!(
            service.delete_expense(&expense.id).await,
            Err(LedgerError::ExpenseNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_export_workbook() {
        let (_dir, _store, service) = service();
        service.save_entry(draft(json!({ "uniqueID": "NSGD-1", "amount": 10 }))).await.unwrap();

        let bytes = service.export_workbook().await.unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
