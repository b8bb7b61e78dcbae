//! SQLite bootstrap for the preferences store.
//!
//! # Responsibility
//! - Open and configure SQLite connections backing `SqliteStore`.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No store reads or writes happen before migrations succeed.
//! - Failures surface as `StoreError`; this layer has no error type of its
//!   own.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
