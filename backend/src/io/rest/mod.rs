//! # REST API Interface Layer
//!
//! One handler per user action. Handlers never fail the session: domain
//! errors become an HTTP error status plus a message on the status board,
//! and storage failures are reported on the status board while the request
//! itself still succeeds.

pub mod child_apis;
pub mod csv_apis;
pub mod receipt_apis;
pub mod settings_apis;
pub mod status_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::domain::{LedgerError, RecordStore};
use crate::AppState;

/// Convert a domain error into a response, posting `message` as the status
pub(crate) fn error_response(state: &AppState, e: LedgerError, message: &str) -> Response {
    let status = match &e {
        LedgerError::Validation(_) | LedgerError::Parse(_) | LedgerError::Configuration(_) => {
            warn!("{}: {}", message, e);
            StatusCode::BAD_REQUEST
        }
        LedgerError::Persistence(_) => {
            error!("{}: {}", message, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    state.status.post(message);
    (status, message.to_string()).into_response()
}

/// Surface a storage failure left behind by the last ledger operation
pub(crate) fn report_storage_error(state: &AppState, ledger: &mut RecordStore) {
    if let Some(e) = ledger.take_storage_error() {
        error!("❌ Ledger change kept in memory only: {}", e);
        state.status.post("Failed to save data.");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{body::Body, http::Request, Router};

    use crate::config::AppConfig;
    use crate::domain::{ReceiptParams, ReceiptSender, SendError};
    use crate::storage::{InMemoryKeyValueStore, KeyValueStorage};
    use crate::{create_router, AppState};

    /// Sender that accepts everything without touching the network
    pub struct AcceptingSender;

    #[async_trait]
    impl ReceiptSender for AcceptingSender {
        fn init(&self, _public_key: &str) {}

        async fn send(&self, _: &str, _: &str, _: &ReceiptParams) -> Result<(), SendError> {
            Ok(())
        }
    }

    pub async fn test_app() -> (Router, AppState) {
        test_app_with(Arc::new(InMemoryKeyValueStore::new()), Arc::new(AcceptingSender)).await
    }

    /// Unseeded app over the given store and sender
    pub async fn test_app_with(
        kv: Arc<dyn KeyValueStorage>,
        sender: Arc<dyn ReceiptSender>,
    ) -> (Router, AppState) {
        let config = AppConfig {
            seed_demo: false,
            ..AppConfig::default()
        };
        let state = AppState::new(kv, sender, config).await;
        let router = create_router(state.clone()).expect("Failed to build router");
        (router, state)
    }

    pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    pub async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
