use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::mailer::Mailer;

pub mod admin;
pub mod auth;
pub mod user;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub mailer: Arc<dyn Mailer>,
    /// Horizon for the expiring-subscribers query, in days.
    pub expiring_window_days: u32,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health, admin, auth, and user routes.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new().route("/health", get(health));

    let admin_routes = Router::new()
        .route("/api/admin/subscriber/register", post(admin::register_subscriber))
        .route("/api/admin/subscribers/expiring", get(admin::expiring_subscribers))
        .route(
            "/api/admin/subscribers/:mobile_number/history",
            get(admin::recharge_history),
        );

    let auth_routes = Router::new().route("/api/auth/validate-mobile", post(auth::validate_mobile));

    let user_routes = Router::new()
        .route("/api/user/plans", get(user::list_plans))
        .route("/api/user/recharge", post(user::recharge));

    public
        .merge(admin_routes)
        .merge(auth_routes)
        .merge(user_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
