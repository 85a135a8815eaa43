//! Road Accident Severity - Prediction Form Server
//!
//! Serves the accident input form and a JSON API over one shared predictor.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  SEVERITY SERVER (Axum)                  │
//! ├──────────────────────────────────────────────────────────┤
//! │   GET/POST /          GET /api/v1/vocabulary             │
//! │   POST /api/v1/predict   GET /api/v1/model   GET /health │
//! │                      │                                   │
//! │                      ▼                                   │
//! │            Arc<SeverityPredictor>                        │
//! │   (encoders + scaler + model, loaded once at startup)    │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;
mod render;


use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use severity_core::SeverityPredictor;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "severity_server=debug,severity_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json || config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Severity prediction server starting ({})...", config.environment);

    let predictor = SeverityPredictor::from_artifacts(&config.artifacts)
        .with_context(|| format!("Failed to load artifacts (model: {})", config.artifacts.model.display()))?;

    let info = predictor.model_info();
    tracing::info!(
        model = %info.name,
        probabilities = info.supports_probabilities,
        scaler = predictor.scaler().kind(),
        "Artifacts loaded"
    );

    // Build application state
    let state = AppState {
        predictor: Arc::new(predictor),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<SeverityPredictor>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let form_routes = Router::new()
        .route("/", get(handlers::form::show).post(handlers::form::submit));

    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/vocabulary", get(handlers::catalog::vocabulary))
        .route("/api/v1/model", get(handlers::catalog::model));

    Router::new()
        .merge(form_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
