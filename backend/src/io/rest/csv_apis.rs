//! # REST API for CSV Import and Export

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use shared::ImportCsvResponse;
use tracing::info;

use super::{error_response, report_storage_error};
use crate::domain::csv_codec;
use crate::domain::date_utils::today_iso;
use crate::domain::AddChildCommand;
use crate::AppState;

/// Import every usable row of a CSV upload, or nothing at all
pub async fn import_csv(State(state): State<AppState>, body: String) -> impl IntoResponse {
    info!("POST /api/import/csv - {} bytes", body.len());

    let rows = match csv_codec::decode(&body) {
        Ok(rows) => rows,
        Err(e) => return error_response(&state, e, "Failed to import CSV."),
    };

    let commands: Vec<AddChildCommand> = rows
        .into_iter()
        .map(|row| {
            AddChildCommand::from(row)
                .with_defaults(state.config.default_amount, &state.config.default_week)
        })
        .collect();

    let mut ledger = state.ledger.lock().await;
    match ledger.add_many(commands).await {
        Ok(created) => {
            let message = format!("Imported {} records.", created.len());
            state.status.post(message.clone());
            report_storage_error(&state, &mut ledger);
            let response = ImportCsvResponse {
                imported: created.len(),
                success_message: message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(&state, e, "Failed to import CSV."),
    }
}

/// Download the whole ledger as CSV
pub async fn export_csv(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/csv");

    let ledger = state.ledger.lock().await;
    let content = csv_codec::encode(ledger.records());
    let filename = csv_codec::export_filename(&today_iso());
    info!("✅ Exported {} records as {}", ledger.records().len(), filename);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        content,
    )
}
