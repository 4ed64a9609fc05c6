use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use models::{subscriber, validate};
use service::{recharge_service, subscriber_service};

use crate::errors::ApiError;
use crate::routes::ServerState;

/// `POST /api/admin/subscriber/register`
///
/// 200 with a plain-text confirmation; 400 with the first failing
/// validation message; 409 when the mobile number or email is taken.
pub async fn register_subscriber(
    State(state): State<ServerState>,
    Json(payload): Json<subscriber_service::NewSubscriber>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let today = Utc::now().date_naive();
    subscriber_service::register(&state.db, &payload, today).await?;
    Ok((StatusCode::OK, "Subscriber registered successfully"))
}

/// `GET /api/admin/subscribers/expiring`
///
/// Subscribers whose plan expiry falls within the configured window.
pub async fn expiring_subscribers(
    State(state): State<ServerState>,
) -> Result<Json<Vec<subscriber::Model>>, ApiError> {
    let today = Utc::now().date_naive();
    let expiring =
        subscriber_service::list_expiring(&state.db, today, state.expiring_window_days).await?;
    Ok(Json(expiring))
}

/// `GET /api/admin/subscribers/{mobile_number}/history`
///
/// 400 with an empty body when the path parameter fails the ten-digit
/// pattern; otherwise the full history, possibly empty. Lookup failures go
/// through the usual error envelope.
pub async fn recharge_history(
    State(state): State<ServerState>,
    Path(mobile_number): Path<String>,
) -> Response {
    if !validate::is_valid_mobile(&mobile_number) {
        return StatusCode::BAD_REQUEST.into_response();
    }
    match recharge_service::history(&state.db, &mobile_number).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
