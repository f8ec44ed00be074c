//! # Vaccination Registry Backend
//!
//! Record intake and listing service for child vaccination registrations.
//!
//! ## Architecture
//!
//! ```text
//! Presentation layer (static pages, any HTTP client)
//!     ↓
//! IO Layer (REST handlers, DTO mapping)
//!     ↓
//! Domain Layer (validation, schedule derivation, reminders)
//!     ↓
//! Storage Layer (SQLite record store)
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logger;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::domain::{ChildService, ReminderNotifier, SmtpReminderNotifier};
use crate::storage::{DbConnection, SqliteChildRepository};

/// Main application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub child_service: ChildService,
}

impl AppState {
    pub fn new(child_service: ChildService) -> Self {
        Self { child_service }
    }
}

/// Initialize storage, schedule rules and services from configuration
pub async fn initialize_backend(config: &ServerConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db_conn = DbConnection::new(&config.database_url, &config.store_settings()).await?;
    let storage = Arc::new(SqliteChildRepository::new(db_conn));

    info!("Loading vaccination schedule rules");
    let rules = Arc::new(config.schedule_rules()?);
    info!("Using {} vaccine rules", rules.vaccines.len());

    let mut child_service = ChildService::new(storage, rules, config.store_timeout());
    if let Some(smtp) = config.smtp_config() {
        let notifier: Arc<dyn ReminderNotifier> = Arc::new(SmtpReminderNotifier::new(smtp)?);
        child_service = child_service.with_notifier(notifier);
    } else {
        info!("No SMTP relay configured, schedule reminders disabled");
    }

    Ok(AppState::new(child_service))
}

/// Create the Axum router with all API routes
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/submit-data", post(io::submit_data))
        .route("/get-data", get(io::get_data))
        .route("/vaccines", get(io::list_vaccines))
        .with_state(app_state)
}

/// Add request tracing, CORS and, if configured, the static page fallback
pub fn with_http_layers(router: Router, config: &ServerConfig) -> Result<Router> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .context("Invalid CORS origin")?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let router = match &config.static_dir {
        Some(dir) => {
            info!("Serving static files from {}", dir.display());
            router.fallback_service(ServeDir::new(dir))
        }
        None => router,
    };

    Ok(router.layer(cors).layer(TraceLayer::new_for_http()))
}
