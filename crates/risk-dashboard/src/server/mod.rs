//! HTTP surface of the dashboard.
//!
//! The loaded classifier is owned by [`AppState`] and handed to every handler
//! through axum's state extractor.
mod assets;
mod error;
mod handlers;
mod render;

pub use error::ApiError;
pub use handlers::{ModelSummary, PredictRequest, PredictResponse};

use anyhow::Context as _;
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use axum::routing::{get, post};
use risk_model::ModelArtifact;
use risk_runtime::{Inference, InferenceBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpListener;
use tracing::Instrument;

use crate::catalog::SectionCatalog;
use crate::config::DashboardConfig;

#[derive(Clone)]
pub struct AppState {
    pub inference: Arc<Inference<ModelArtifact>>,
    pub catalog: Arc<SectionCatalog>,
    pub asset_root: Arc<PathBuf>,
    pub dataset_path: Arc<PathBuf>,
    request_seq: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(
        inference: Inference<ModelArtifact>,
        catalog: SectionCatalog,
        asset_root: PathBuf,
        dataset_path: PathBuf,
    ) -> Self {
        Self {
            inference: Arc::new(inference),
            catalog: Arc::new(catalog),
            asset_root: Arc::new(asset_root),
            dataset_path: Arc::new(dataset_path),
            request_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Loads the model and the section catalog named by `config`.
    ///
    /// A missing or corrupt artifact aborts startup; there is no fallback
    /// model.
    pub fn load(config: &DashboardConfig) -> anyhow::Result<Self> {
        let inference = load_inference(&config.model_path)?;
        let catalog = SectionCatalog::load(&config.catalog_path)?;

        Ok(Self::new(
            inference,
            catalog,
            config.asset_root.clone(),
            config.dataset_path.clone(),
        ))
    }

    fn next_request_id(&self) -> String {
        let seq = self.request_seq.fetch_add(1, Ordering::Relaxed);
        format!("req-{seq:08x}")
    }
}

/// Loads the artifact at `path` and checks it against the feature schema.
pub fn load_inference(path: &Path) -> anyhow::Result<Inference<ModelArtifact>> {
    InferenceBuilder::<ModelArtifact>::new()
        .init(path)
        .and_then(|loaded| loaded.build())
        .with_context(|| format!("Cannot use model artifact {}", path.display()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/healthz", get(handlers::healthz_handler))
        .route("/sections/:slug", get(handlers::section_handler))
        .route("/predict", get(handlers::predict_page_handler))
        .route("/api/predict", post(handlers::predict_api_handler))
        .route("/api/model", get(handlers::model_handler))
        .route("/assets/*path", get(assets::asset_handler))
        .route("/download/dataset", get(assets::dataset_handler))
        .fallback(handlers::not_found_handler)
        .layer(from_fn_with_state(state.clone(), request_tracing_middleware))
        .with_state(state)
}

async fn request_tracing_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let request_id = state.next_request_id();
    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %request.method(),
        route = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| tracing::debug!(status = response.status().as_u16(), "request completed"));
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Serves the dashboard until Ctrl-C.
pub async fn serve(config: &DashboardConfig, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!(
        addr = %config.bind,
        model = %state.inference.id,
        "dashboard listening"
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
