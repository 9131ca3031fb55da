//! HTTP surface for the processing pipeline.
//!
//! `POST /api/process` runs one text through extraction and the
//! classification cascade. The pipeline never fails, so every response is
//! `success: true`; inputs without numeric content get the placeholder
//! output and its message.

use crate::config::AppConfig;
use crate::error::Result;
use crate::runtime::{build_pipeline, AppPipeline, AppStore};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabviz_domain::VisualizationOutput;
use tokio::net::TcpListener;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Extraction and classification
    pub pipeline: Arc<AppPipeline>,
    /// Exemplar store behind the retrieval stage
    pub store: Arc<AppStore>,
    /// Whether the generative stage has a backend
    pub advisor_enabled: bool,
}

/// Processing request
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    /// Free-form text; missing means empty
    #[serde(default)]
    pub text: String,
}

/// Processing response
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// Always true
    pub success: bool,
    /// Records and chart decision
    #[serde(flatten)]
    pub output: VisualizationOutput,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Stored exemplars available to retrieval
    pub exemplars: usize,
    /// Whether the generative stage is configured
    pub advisor: bool,
}

impl AppState {
    /// Build the pipeline around a shared store
    pub fn from_config(config: &AppConfig, store: Arc<AppStore>) -> Self {
        Self {
            pipeline: Arc::new(build_pipeline(config, Arc::clone(&store))),
            store,
            advisor_enabled: config.ollama.advisor_enabled,
        }
    }
}

/// POST /api/process - Extract and classify one text
async fn process(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> Json<ProcessResponse> {
    let output = state.pipeline.process(&request.text).await;
    Json(ProcessResponse {
        success: true,
        output,
    })
}

/// GET /health - Store and advisor status
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        exemplars: state.store.len(),
        advisor: state.advisor_enabled,
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/process", post(process))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
