//! # ClinicDesk API
//!
//! The API crate provides the web server for the student clinic: consultation
//! scheduling and medical record listings.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into service calls
//! - **Services**: Scheduling rules and the listing cache
//! - **Middleware**: Caller identity extraction and error mapping
//! - **Config**: Handle environment and application configuration
//!
//! Stores are injected as trait objects so the same router runs against
//! Postgres in production and an in-memory store in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Identity extraction and error mapping
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Scheduling service and listing cache
pub mod services;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use clinicdesk_db::store::{ConsultationStore, MedicalRecordStore, PgStore};
use eyre::{Result, WrapErr};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::services::scheduling::SchedulingService;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Consultation date listing and creation
    pub scheduling: SchedulingService,
    /// Medical record reads
    pub records: Arc<dyn MedicalRecordStore>,
}

impl ApiState {
    pub fn new(
        consultations: Arc<dyn ConsultationStore>,
        records: Arc<dyn MedicalRecordStore>,
        store_throttle: Duration,
        listing_cache_ttl: Duration,
    ) -> Self {
        Self {
            scheduling: SchedulingService::new(consultations, store_throttle, listing_cache_ttl),
            records,
        }
    }

    /// State backed by a Postgres pool, tuned by `config`.
    pub fn from_pool(config: &config::ApiConfig, db_pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(db_pool));
        Self::new(
            store.clone(),
            store,
            config.store_throttle,
            config.listing_cache_ttl,
        )
    }
}

/// Builds the application router over `state`, without transport layers.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Consultation scheduling endpoints
        .merge(routes::consultation::routes())
        // Medical record endpoints
        .merge(routes::medical_record::routes())
        // Attach shared state to all routes
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ])
        .allow_origin(origins)
        .allow_credentials(true))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Starts the API server with the provided configuration and database connection
///
/// Serves until Ctrl-C or SIGTERM, then drains in-flight requests and closes
/// the pool.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let filter = EnvFilter::try_new(&config.log_level)
        .wrap_err_with(|| format!("Invalid LOG_LEVEL: {}", config.log_level))?;
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::from_pool(&config, db_pool.clone()));

    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    info!("Database pool closed");

    Ok(())
}
