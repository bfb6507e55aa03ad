pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod locks;
pub mod mail;
pub mod runner;

use axum::Router;
use contrack_core::TrackerSettings;
use contrack_engine::{LogMailer, Mailer};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;
use crate::locks::WorkbookLocks;
use crate::mail::SmtpMailer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub locks: Arc<WorkbookLocks>,
    pub settings: Arc<TrackerSettings>,
    pub mailer: Arc<dyn Mailer>,
}

/// Build the router with tracing and CORS layers
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the server with the given configuration
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let settings = Arc::new(config.load_settings()?);

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpMailer::new(smtp)?),
        None => {
            tracing::warn!("SMTP_HOST not set; outgoing email will only be logged");
            Arc::new(LogMailer)
        }
    };

    // Initialize database
    let db = Database::connect(&config.database_url).await?;

    // Run migrations
    db.migrate().await?;

    let state = AppState {
        db,
        locks: Arc::new(WorkbookLocks::new()),
        settings,
        mailer,
    };

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
