use std::{net::SocketAddr, sync::Arc};

use axum::http::HeaderValue;
use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::mailer::{Mailer, NoopMailer, SmtpMailer};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

/// Build the CORS layer from the configured allow-list. The list is the
/// single source of truth for every route; an empty list disables
/// cross-origin access entirely.
pub fn build_cors(cfg: &configs::CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .origins()
        .iter()
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect();
    if origins.is_empty() {
        CorsLayer::new()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    // DB connection pool
    let db = models::db::connect_with_config(&cfg.database).await?;

    // Confirmation mail transport; an unconfigured SMTP host downgrades to
    // a logging stand-in rather than refusing to start.
    let mailer: Arc<dyn Mailer> = match SmtpMailer::from_config(&cfg.mail) {
        Ok(m) => Arc::new(m),
        Err(e) => {
            warn!(error = %e, "smtp unavailable; confirmation emails disabled");
            Arc::new(NoopMailer)
        }
    };

    let state = ServerState {
        db,
        mailer,
        expiring_window_days: cfg.admin.expiring_window_days,
    };

    // Build router
    let cors = build_cors(&cfg.cors);
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, window_days = cfg.admin.expiring_window_days, "starting admin server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
