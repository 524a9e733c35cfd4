//! Core ledger logic for NSGD.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through the [`ledger::LedgerStore`] trait, which the
//! db crate implements.
//!
//! # Modules
//!
//! - `auth` - Operator credential checks
//! - `ledger` - Payment normalization, totals and entry reconciliation
//! - `export` - Spreadsheet export of the ledger
//! - `storage` - Upload storage keyed by entry id

pub mod auth;
pub mod export;
pub mod ledger;
pub mod storage;
