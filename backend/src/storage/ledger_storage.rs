//! Persistence adapter for the ledger.
//!
//! Holds the two JSON blobs the ledger needs: the child-record list and the
//! email settings. Storage and JSON failures come back as
//! [`LedgerError::Persistence`] so callers can decide how loudly to fail.

use std::sync::Arc;

use shared::{ChildRecord, EmailSettings};
use tracing::debug;

use super::traits::KeyValueStorage;
use crate::domain::errors::LedgerError;

pub const CHILDREN_KEY: &str = "children";
pub const SETTINGS_KEY: &str = "emailSettings";

#[derive(Clone)]
pub struct LedgerStorage {
    kv: Arc<dyn KeyValueStorage>,
}

impl LedgerStorage {
    pub fn new(kv: Arc<dyn KeyValueStorage>) -> Self {
        Self { kv }
    }

    /// Load the record list; an absent key is an empty ledger
    pub async fn load_children(&self) -> Result<Vec<ChildRecord>, LedgerError> {
        match self.read(CHILDREN_KEY).await? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                LedgerError::Persistence(format!("Corrupt {} value: {}", CHILDREN_KEY, e))
            }),
            None => Ok(Vec::new()),
        }
    }

    pub async fn save_children(&self, children: &[ChildRecord]) -> Result<(), LedgerError> {
        let json = serde_json::to_string(children)
            .map_err(|e| LedgerError::Persistence(e.to_string()))?;
        self.write(CHILDREN_KEY, &json).await?;
        debug!("Persisted {} child records", children.len());
        Ok(())
    }

    /// Load settings; an absent key yields empty settings
    pub async fn load_settings(&self) -> Result<EmailSettings, LedgerError> {
        match self.read(SETTINGS_KEY).await? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                LedgerError::Persistence(format!("Corrupt {} value: {}", SETTINGS_KEY, e))
            }),
            None => Ok(EmailSettings::default()),
        }
    }

    pub async fn save_settings(&self, settings: &EmailSettings) -> Result<(), LedgerError> {
        let json = serde_json::to_string(settings)
            .map_err(|e| LedgerError::Persistence(e.to_string()))?;
        self.write(SETTINGS_KEY, &json).await
    }

    async fn read(&self, key: &str) -> Result<Option<String>, LedgerError> {
        self.kv
            .get_value(key)
            .await
            .map_err(|e| LedgerError::Persistence(format!("Failed to read {}: {:#}", key, e)))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), LedgerError> {
        self.kv
            .put_value(key, value)
            .await
            .map_err(|e| LedgerError::Persistence(format!("Failed to write {}: {:#}", key, e)))
    }
}
