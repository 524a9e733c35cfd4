//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod entry;
pub mod expense;
pub mod ledger_store;

pub use entry::EntryRepository;
pub use expense::ExpenseRepository;
pub use ledger_store::SeaLedgerStore;
