//! # REST API for Email Settings

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{EmailSettings, SettingsResponse};
use tracing::info;

use super::error_response;
use crate::AppState;

pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings");
    (StatusCode::OK, Json(state.settings_service.load().await))
}

/// Overwrite the settings and re-initialize the sender with the new key
pub async fn save_settings(
    State(state): State<AppState>,
    Json(request): Json<EmailSettings>,
) -> impl IntoResponse {
    info!("PUT /api/settings");

    match state.settings_service.save(request).await {
        Ok(settings) => {
            state.sender.init(&settings.public_key);
            state.status.post("Settings saved.");
            let response = SettingsResponse {
                settings,
                success_message: "Settings saved.".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let message = e.to_string();
            error_response(&state, e, &message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{body_text, empty_request, json_request, test_app};
    use serde_json::json;
    use shared::EmailSettings;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_save_and_load_settings() {
        let (app, _) = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/settings",
                json!({"publicKey": " pk ", "serviceId": "svc", "templatePaid": "tp", "templateUnpaid": "tu"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let response = app.oneshot(empty_request("GET", "/api/settings")).await.unwrap();
        let settings: EmailSettings = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(settings.public_key, "pk");
        assert_eq!(settings.template_unpaid, "tu");
    }

    #[tokio::test]
    async fn test_incomplete_settings_rejected() {
        let (app, _) = test_app().await;

        let response = app
            .oneshot(json_request("PUT", "/api/settings", json!({"serviceId": "svc"})))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }
}
