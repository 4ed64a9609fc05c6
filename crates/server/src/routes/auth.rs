use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use service::subscriber_service;

use crate::errors::ApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateMobileRequest {
    #[serde(default)]
    pub mobile_number: Option<String>,
}

/// `POST /api/auth/validate-mobile`
///
/// Pattern-checks the number, then reports whether it belongs to a
/// registered subscriber.
pub async fn validate_mobile(
    State(state): State<ServerState>,
    Json(payload): Json<ValidateMobileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mobile = payload.mobile_number.as_deref().unwrap_or("");
    let registered = subscriber_service::mobile_registered(&state.db, mobile).await?;
    Ok(Json(serde_json::json!({ "registered": registered })))
}
