//! # Weekly Payments Backend
//!
//! Ledger for children's weekly allowance payments: records, paid/unpaid
//! tracking, CSV import/export and email receipts.
//!
//! ## Architecture
//!
//! ```text
//! HTTP client
//!     ↓
//! IO Layer (REST handlers, EmailJS sender)
//!     ↓
//! Domain Layer (record store, CSV codec, receipt dispatcher, settings)
//!     ↓
//! Storage Layer (JSON blobs in a key-value store)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{ReceiptDispatcher, ReceiptSender, RecordStore, SettingsService, StatusBoard};
use crate::io::emailjs::EmailJsSender;
use crate::storage::{KeyValueStorage, LedgerStorage, SqliteKeyValueStore};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Single writer: every ledger operation runs under this lock. Receipt
    /// batches release it while a send is in flight.
    pub ledger: Arc<Mutex<RecordStore>>,
    pub settings_service: SettingsService,
    pub dispatcher: ReceiptDispatcher,
    pub sender: Arc<dyn ReceiptSender>,
    pub status: Arc<StatusBoard>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Assemble the services on top of an already opened key-value store
    pub async fn new(
        kv: Arc<dyn KeyValueStorage>,
        sender: Arc<dyn ReceiptSender>,
        config: AppConfig,
    ) -> Self {
        let storage = LedgerStorage::new(kv);
        let status = Arc::new(StatusBoard::new());

        let mut ledger = RecordStore::open(storage.clone()).await;
        if ledger.take_storage_error().is_some() {
            // Seeding now would overwrite whatever the failed read missed
            status.post("Failed to load data.");
        } else if config.seed_demo {
            ledger.seed_demo_records().await;
            if ledger.take_storage_error().is_some() {
                status.post("Failed to save data.");
            }
        }

        let settings_service = SettingsService::new(storage);
        let settings = settings_service.load().await;
        if !settings.public_key.is_empty() {
            sender.init(&settings.public_key);
        }
        if !settings.is_complete() {
            info!("Email settings incomplete, receipts disabled until configured");
        }

        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            settings_service,
            dispatcher: ReceiptDispatcher::new(config.default_week.clone()),
            sender,
            status,
            config: Arc::new(config),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: AppConfig) -> Result<AppState> {
    info!("Setting up key-value store at {}", config.database_url);
    let kv = SqliteKeyValueStore::open(&config.database_url)
        .await
        .context("Failed to open ledger storage")?;

    info!("Setting up domain services");
    let sender = Arc::new(EmailJsSender::new(config.emailjs_base_url.clone())?);
    Ok(AppState::new(Arc::new(kv), sender, config).await)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Result<Router> {
    let origin = app_state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", app_state.config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/children",
            get(io::rest::child_apis::list_children).post(io::rest::child_apis::create_child),
        )
        .route(
            "/children/:id",
            put(io::rest::child_apis::update_child).delete(io::rest::child_apis::delete_child),
        )
        .route("/children/:id/paid", post(io::rest::child_apis::set_paid))
        .route("/summary", get(io::rest::status_apis::get_summary))
        .route("/status", get(io::rest::status_apis::get_status))
        .route(
            "/settings",
            get(io::rest::settings_apis::get_settings).put(io::rest::settings_apis::save_settings),
        )
        .route("/import/csv", post(io::rest::csv_apis::import_csv))
        .route("/export/csv", get(io::rest::csv_apis::export_csv))
        .route("/receipts/send", post(io::rest::receipt_apis::send_receipts));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::AcceptingSender;
    use crate::storage::test_utils::FailingKeyValueStore;

    fn seeded_config() -> AppConfig {
        AppConfig {
            seed_demo: true,
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_seeds_empty_ledger() {
        let kv = FailingKeyValueStore::healthy();
        let state = AppState::new(Arc::new(kv), Arc::new(AcceptingSender), seeded_config()).await;

        assert_eq!(state.ledger.lock().await.records().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_does_not_overwrite_stored_records() {
        let kv = FailingKeyValueStore::healthy();
        let stored = r#"[{"id":"1","name":"Ava","email":"p@x.com","amount":25}]"#;
        kv.put_value("children", stored).await.unwrap();
        kv.set_fail_reads(true);

        let state =
            AppState::new(Arc::new(kv.clone()), Arc::new(AcceptingSender), seeded_config()).await;
        assert!(state.ledger.lock().await.records().is_empty());

        kv.set_fail_reads(false);
        assert_eq!(kv.get_value("children").await.unwrap().as_deref(), Some(stored));
    }
}
