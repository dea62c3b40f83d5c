use shared::EmailSettings;
use tracing::{info, warn};

use super::errors::LedgerError;
use crate::storage::LedgerStorage;

/// Loads and saves the email provider settings
#[derive(Clone)]
pub struct SettingsService {
    storage: LedgerStorage,
}

impl SettingsService {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    /// Current settings; unreadable settings are treated as unset
    pub async fn load(&self) -> EmailSettings {
        match self.storage.load_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load email settings: {}", e);
                EmailSettings::default()
            }
        }
    }

    /// Trim and validate `settings`, then overwrite the stored value
    pub async fn save(&self, settings: EmailSettings) -> Result<EmailSettings, LedgerError> {
        let settings = EmailSettings {
            public_key: settings.public_key.trim().to_string(),
            service_id: settings.service_id.trim().to_string(),
            template_paid: settings.template_paid.trim().to_string(),
            template_unpaid: settings.template_unpaid.trim().to_string(),
        };

        let missing = settings.missing_fields();
        if !missing.is_empty() {
            return Err(LedgerError::Validation(format!(
                "All email settings are required (missing: {}).",
                missing.join(", ")
            )));
        }

        self.storage.save_settings(&settings).await?;
        info!("📧 Saved email settings for service {}", settings.service_id);
        Ok(settings)
    }
}
