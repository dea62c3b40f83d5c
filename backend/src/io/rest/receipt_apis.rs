//! # REST API for Email Receipts

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::SendReceiptsResponse;
use tracing::info;

use super::{error_response, report_storage_error};
use crate::AppState;

/// Run one dispatch batch over every record still waiting for a receipt
pub async fn send_receipts(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/receipts/send");

    let settings = state.settings_service.load().await;

    match state
        .dispatcher
        .send_pending(&state.ledger, &settings, state.sender.as_ref())
        .await
    {
        Ok(summary) => {
            let message = if summary.attempted() == 0 {
                "No pending receipts.".to_string()
            } else {
                format!("Receipts sent: {} • Failed: {}", summary.sent, summary.failed)
            };
            state.status.post(message.clone());
            report_storage_error(&state, &mut *state.ledger.lock().await);

            let response = SendReceiptsResponse {
                sent: summary.sent,
                failed: summary.failed,
                success_message: message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(&state, e, "Configure EmailJS settings first."),
    }
}
