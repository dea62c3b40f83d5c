//! Receipt dispatch.
//!
//! A dispatch batch walks every record whose receipt has not been sent yet,
//! paid or not, and sends one email per record through a [`ReceiptSender`].
//! Sends happen strictly one after another; a failed send is counted and the
//! batch moves on, leaving that record pending for the next batch. The ledger
//! lock is only held between sends, so the rest of the API keeps answering
//! while a send is in flight.

use async_trait::async_trait;
use serde::Serialize;
use shared::{format_amount, ChildRecord, EmailSettings};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::commands::ChildPatch;
use super::date_utils::today_iso;
use super::errors::{LedgerError, SendError};
use super::record_store::RecordStore;

/// Template parameters handed to the email provider
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptParams {
    pub child_name: String,
    pub parent_email: String,
    pub amount: String,
    pub week: String,
    pub date_paid: String,
}

/// Transactional email provider
#[async_trait]
pub trait ReceiptSender: Send + Sync {
    /// Register the provider public key; must happen before the first send
    fn init(&self, public_key: &str);

    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &ReceiptParams,
    ) -> Result<(), SendError>;
}

/// Outcome of one dispatch batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}

impl DispatchSummary {
    pub fn attempted(&self) -> usize {
        self.sent + self.failed
    }
}

#[derive(Clone)]
pub struct ReceiptDispatcher {
    default_week: String,
}

impl ReceiptDispatcher {
    /// `default_week` labels receipts for records that have no week of their own
    pub fn new(default_week: impl Into<String>) -> Self {
        Self {
            default_week: default_week.into(),
        }
    }

    /// Send a receipt for every record that has not had one yet.
    ///
    /// Fails before sending anything when the settings are incomplete.
    pub async fn send_pending(
        &self,
        ledger: &Mutex<RecordStore>,
        settings: &EmailSettings,
        sender: &dyn ReceiptSender,
    ) -> Result<DispatchSummary, LedgerError> {
        let missing = settings.missing_fields();
        if !missing.is_empty() {
            warn!("Receipt dispatch refused, settings missing: {:?}", missing);
            return Err(LedgerError::Configuration(missing));
        }
        sender.init(&settings.public_key);

        let pending: Vec<ChildRecord> = ledger
            .lock()
            .await
            .records()
            .iter()
            .filter(|c| !c.receipt_sent)
            .cloned()
            .collect();
        info!("📧 Dispatching {} pending receipts", pending.len());

        let mut summary = DispatchSummary::default();
        for child in pending {
            let template_id = if child.paid {
                &settings.template_paid
            } else {
                &settings.template_unpaid
            };
            let params = self.params_for(&child);

            match sender.send(&settings.service_id, template_id, &params).await {
                Ok(()) => {
                    // A record deleted mid-batch is simply not found here
                    ledger
                        .lock()
                        .await
                        .update(&child.id, ChildPatch::receipt_sent())
                        .await;
                    summary.sent += 1;
                }
                Err(e) => {
                    warn!("❌ Receipt for {} <{}> failed: {}", child.name, child.email, e);
                    summary.failed += 1;
                }
            }
        }

        info!("📧 Receipts sent: {} • Failed: {}", summary.sent, summary.failed);
        Ok(summary)
    }

    fn params_for(&self, child: &ChildRecord) -> ReceiptParams {
        let week = if child.week.is_empty() {
            self.default_week.clone()
        } else {
            child.week.clone()
        };
        let date_paid = if child.date_paid.is_empty() {
            today_iso()
        } else {
            child.date_paid.clone()
        };
        ReceiptParams {
            child_name: child.name.clone(),
            parent_email: child.email.clone(),
            amount: format_amount(child.amount),
            week,
            date_paid,
        }
    }
}
