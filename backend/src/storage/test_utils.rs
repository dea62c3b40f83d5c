//! Storage doubles for tests.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::memory::InMemoryKeyValueStore;
use super::traits::KeyValueStorage;

/// Key-value store whose reads and writes can be switched to fail
#[derive(Clone)]
pub struct FailingKeyValueStore {
    inner: InMemoryKeyValueStore,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl FailingKeyValueStore {
    /// A store that fails every operation
    pub fn new() -> Self {
        let store = Self::healthy();
        store.set_fail_reads(true);
        store.set_fail_writes(true);
        store
    }

    /// A store that works until told otherwise
    pub fn healthy() -> Self {
        Self {
            inner: InMemoryKeyValueStore::new(),
            fail_reads: Arc::new(AtomicBool::new(false)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStorage for FailingKeyValueStore {
    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("simulated read failure");
        }
        self.inner.get_value(key).await
    }

    async fn put_value(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("simulated quota exceeded");
        }
        self.inner.put_value(key, value).await
    }
}
