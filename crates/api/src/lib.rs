//! Flight Delay API Server
//!
//! REST API serving delay predictions from a model loaded once at start-up.

use axum::{
    routing::{get, post},
    Router,
};
use feature_engine::Preprocessor;
use flight_validator::{ValidationConfig, Validator};
use inference_engine::InferenceEngine;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use storage::FileModelStore;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
pub mod routes;
mod settings;

pub use error::ApiError;
pub use settings::{LogFormat, ServiceConfig};

/// Application state shared across handlers. Immutable once built.
pub struct AppState {
    /// Loaded delay model
    pub engine: InferenceEngine,
    /// Feature pipeline
    pub preprocessor: Preprocessor,
    /// Request validator
    pub validator: Validator,
    /// Prometheus handle, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
}

impl AppState {
    /// Create application state around a loaded model
    pub fn new(engine: InferenceEngine, config: &ServiceConfig) -> Self {
        Self {
            engine,
            preprocessor: Preprocessor::default(),
            validator: Validator::new(ValidationConfig {
                max_batch_size: config.max_batch_size,
                ..Default::default()
            }),
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Attach a Prometheus handle
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::get_health))
        .route("/predict", post(routes::predict::post_predict))
        .route("/metrics", get(routes::prometheus::get_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging
pub fn init_logging(config: &ServiceConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

/// Install the global Prometheus recorder
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    Ok(PrometheusBuilder::new().install_recorder()?)
}

/// Load the model and run the server until it stops
pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    let store = FileModelStore::new(&config.model_path);
    let engine = InferenceEngine::load(&store)?;
    info!("Serving model loaded from {}", engine.source());

    let mut state = AppState::new(engine, &config);
    if config.metrics_enabled {
        state = state.with_metrics(init_metrics()?);
    }
    let app = create_router(Arc::new(state));

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
