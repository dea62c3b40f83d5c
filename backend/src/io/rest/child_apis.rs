//! # REST API for Child Records
//!
//! Endpoints for listing, creating, editing, deleting and marking records
//! paid.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use shared::{ChildListResponse, ChildResponse, CreateChildRequest, SetPaidRequest, UpdateChildRequest};
use tracing::info;

use super::{error_response, report_storage_error};
use crate::domain::AddChildCommand;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChildListQuery {
    #[serde(default)]
    pub filter: Option<String>,
}

/// List records matching the optional search filter
pub async fn list_children(
    State(state): State<AppState>,
    Query(query): Query<ChildListQuery>,
) -> impl IntoResponse {
    let filter = query.filter.unwrap_or_default();
    info!("GET /api/children - filter: {:?}", filter);

    let ledger = state.ledger.lock().await;
    let response = ChildListResponse {
        children: ledger.list(&filter),
        summary: ledger.summary(),
    };
    (StatusCode::OK, Json(response))
}

/// Create a new child record
pub async fn create_child(
    State(state): State<AppState>,
    Json(request): Json<CreateChildRequest>,
) -> impl IntoResponse {
    info!("POST /api/children - request: {:?}", request);

    let command = AddChildCommand::from(request)
        .with_defaults(state.config.default_amount, &state.config.default_week);

    let mut ledger = state.ledger.lock().await;
    match ledger.add(command).await {
        Ok(child) => {
            state.status.post(format!("Added child: {}", child.name));
            report_storage_error(&state, &mut ledger);
            let response = ChildResponse {
                child,
                success_message: "Child added successfully".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response(&state, e, "Name and email are required."),
    }
}

/// Apply an edit to an existing record
pub async fn update_child(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<UpdateChildRequest>,
) -> impl IntoResponse {
    info!("PUT /api/children/{} - request: {:?}", child_id, request);

    let mut ledger = state.ledger.lock().await;
    match ledger.edit(&child_id, AddChildCommand::from(request)).await {
        Ok(true) => {
            report_storage_error(&state, &mut ledger);
            match ledger.get(&child_id).cloned() {
                Some(child) => {
                    let response = ChildResponse {
                        child,
                        success_message: "Child updated successfully".to_string(),
                    };
                    (StatusCode::OK, Json(response)).into_response()
                }
                None => (StatusCode::NOT_FOUND, "Child not found").into_response(),
            }
        }
        Ok(false) => (StatusCode::NOT_FOUND, "Child not found").into_response(),
        Err(e) => error_response(&state, e, "Name and email are required."),
    }
}

/// Delete a record; deleting an unknown id is not an error
pub async fn delete_child(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/children/{}", child_id);

    let mut ledger = state.ledger.lock().await;
    ledger.delete(&child_id).await;
    report_storage_error(&state, &mut ledger);
    StatusCode::NO_CONTENT
}

/// Toggle the paid flag of a record
pub async fn set_paid(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<SetPaidRequest>,
) -> impl IntoResponse {
    info!("POST /api/children/{}/paid - paid: {}", child_id, request.paid);

    let mut ledger = state.ledger.lock().await;
    if !ledger.set_paid(&child_id, request.paid).await {
        return (StatusCode::NOT_FOUND, "Child not found").into_response();
    }
    report_storage_error(&state, &mut ledger);

    match ledger.get(&child_id).cloned() {
        Some(child) => {
            let response = ChildResponse {
                child,
                success_message: if request.paid {
                    "Marked as paid".to_string()
                } else {
                    "Marked as unpaid".to_string()
                },
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Child not found").into_response(),
    }
}
