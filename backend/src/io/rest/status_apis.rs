//! # REST API for Ledger Status
//!
//! The summary counts and the status line (the latest transient message, or
//! the summary once it has expired).

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::StatusResponse;

use crate::AppState;

pub async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    let summary = state.ledger.lock().await.summary();
    (StatusCode::OK, Json(summary))
}

pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let summary = state.ledger.lock().await.summary();
    let response = StatusResponse {
        message: state.status.current(&summary),
    };
    (StatusCode::OK, Json(response))
}
