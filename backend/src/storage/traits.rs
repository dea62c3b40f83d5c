//! # Storage Traits
//!
//! Key-value abstraction the ledger persists through. Any backend that can
//! store a string under a string key works: SQLite on disk, an in-memory map
//! for tests, or something else entirely.

use anyhow::Result;
use async_trait::async_trait;

/// Trait defining the interface for key-value storage operations
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Retrieve the value stored under `key`, if any
    async fn get_value(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, overwriting any existing value
    async fn put_value(&self, key: &str, value: &str) -> Result<()>;
}
