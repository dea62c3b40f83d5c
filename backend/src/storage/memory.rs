use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::KeyValueStorage;

/// Process-local key-value store; contents vanish with the process
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryKeyValueStore {
    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().map_err(|_| anyhow!("Key-value map lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn put_value(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| anyhow!("Key-value map lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
