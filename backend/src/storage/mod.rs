//! # Storage Module
//!
//! Persistence for the ledger. Everything is kept as JSON blobs in a
//! key-value store, so the backend can be swapped (SQLite on disk, an
//! in-memory map) without the domain layer noticing.
//!
//! - **traits**: the [`KeyValueStorage`] abstraction
//! - **sqlite**: SQLite implementation via SQLx
//! - **memory**: in-memory implementation
//! - **ledger_storage**: typed access to the record list and email settings

pub mod ledger_storage;
pub mod memory;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use ledger_storage::LedgerStorage;
pub use memory::InMemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;
pub use traits::KeyValueStorage;
