use axum::extract::State;
use axum::Json;
use chrono::Utc;

use models::plan;
use service::{plan_service, recharge_service};

use crate::errors::ApiError;
use crate::routes::ServerState;

/// `GET /api/user/plans`
pub async fn list_plans(
    State(state): State<ServerState>,
) -> Result<Json<Vec<plan::Model>>, ApiError> {
    let plans = plan_service::list_plans(&state.db).await?;
    Ok(Json(plans))
}

/// `POST /api/user/recharge`
///
/// Records the transaction, moves the subscriber onto the plan, and
/// triggers the confirmation email. Returns the receipt.
pub async fn recharge(
    State(state): State<ServerState>,
    Json(payload): Json<recharge_service::RechargeRequest>,
) -> Result<Json<recharge_service::RechargeReceipt>, ApiError> {
    let today = Utc::now().date_naive();
    let receipt =
        recharge_service::recharge(&state.db, state.mailer.as_ref(), &payload, today).await?;
    Ok(Json(receipt))
}
