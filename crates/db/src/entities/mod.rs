//! `SeaORM` entities.
//!
//! Ledger records are stored as JSON documents; only the columns needed for
//! lookups and ordering are broken out.

pub mod entries;
pub mod expenses;
