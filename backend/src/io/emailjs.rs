//! EmailJS adapter implementing [`ReceiptSender`].
//!
//! Uses the EmailJS REST endpoint directly; the public key that the browser
//! SDK would be initialised with is sent as `user_id` on every request.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::RwLock;
use std::time::Duration;
use tracing::debug;

use crate::domain::{ReceiptParams, ReceiptSender, SendError};

pub const DEFAULT_BASE_URL: &str = "https://api.emailjs.com";
const SEND_PATH: &str = "/api/v1.0/email/send";
/// Upper bound on one send, connect included
pub const SEND_TIMEOUT: Duration = Duration::from_secs(15);

pub struct EmailJsSender {
    client: reqwest::Client,
    base_url: String,
    public_key: RwLock<Option<String>>,
}

impl EmailJsSender {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, SEND_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build EmailJS HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            public_key: RwLock::new(None),
        })
    }

    /// Build the JSON request body for the send endpoint
    pub fn build_request_body(
        public_key: &str,
        service_id: &str,
        template_id: &str,
        params: &ReceiptParams,
    ) -> Value {
        json!({
            "service_id": service_id,
            "template_id": template_id,
            "user_id": public_key,
            "template_params": params,
        })
    }

    fn public_key(&self) -> Option<String> {
        self.public_key.read().ok().and_then(|key| key.clone())
    }
}

#[async_trait]
impl ReceiptSender for EmailJsSender {
    fn init(&self, public_key: &str) {
        if let Ok(mut key) = self.public_key.write() {
            *key = Some(public_key.to_string());
            debug!("EmailJS initialized with public key: {}", public_key);
        }
    }

    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &ReceiptParams,
    ) -> Result<(), SendError> {
        let public_key = self.public_key().ok_or(SendError::NotInitialized)?;
        let body = Self::build_request_body(&public_key, service_id, template_id, params);
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), SEND_PATH);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SendError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("📧 Receipt sent to {} with template {}", params.parent_email, template_id);
        Ok(())
    }
}
