use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path as UrlPath, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use risk_model::{
    FOREST_LOSS_DOMAIN, FeatureRecord, ILLNESS_DOMAIN, ModelArtifact, RiskLabel, illness_count,
};
use risk_runtime::{Classifier, Explanation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::AppState;
use super::error::ApiError;
use super::render;
use crate::catalog::SectionKind;

pub(crate) async fn index_handler(State(state): State<AppState>) -> Redirect {
    Redirect::to(&render::section_href(state.catalog.first()))
}

pub(crate) async fn healthz_handler() -> &'static str {
    "ok"
}

pub(crate) async fn section_handler(
    State(state): State<AppState>,
    UrlPath(slug): UrlPath<String>,
) -> Result<Response, ApiError> {
    let section = state
        .catalog
        .get(&slug)
        .ok_or_else(|| ApiError::NotFound(format!("no section named '{slug}'")))?;

    if section.kind == SectionKind::Prediction {
        return Ok(Redirect::to("/predict").into_response());
    }

    let mut body = render::section_body(section);
    if section.kind == SectionKind::Insights {
        body.push_str(&render::rules(&state.inference.model().tree().rules()));
    }
    body.push_str(&render::closing(section));
    Ok(Html(render::page(&state.catalog, &section.slug, &body)).into_response())
}

fn parse_number(field: &str, raw: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ApiError::InvalidInput(format!("{field} must be a number, got '{raw}'")))
}

/// Form values from the query string; an absent control keeps its default.
fn form_inputs(params: &HashMap<String, String>) -> Result<(f64, u32), ApiError> {
    let forest = match params.get("forest_loss_ha") {
        Some(raw) => parse_number("forest_loss_ha", raw)?,
        None => FOREST_LOSS_DOMAIN.default,
    };
    let illnesses = match params.get("reported_illnesses") {
        Some(raw) => illness_count(parse_number("reported_illnesses", raw)?)?,
        None => ILLNESS_DOMAIN.default,
    };
    Ok((forest, illnesses))
}

pub(crate) async fn predict_page_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let submitted =
        params.contains_key("forest_loss_ha") || params.contains_key("reported_illnesses");
    let inputs = form_inputs(&params);
    let (forest, illnesses) = inputs
        .as_ref()
        .ok()
        .copied()
        .unwrap_or((FOREST_LOSS_DOMAIN.default, ILLNESS_DOMAIN.default));

    let section = state.catalog.prediction_section();
    let (slug, mut body) = match section {
        Some(section) => (section.slug.as_str(), render::section_body(section)),
        None => ("", "<h1>Predict Environmental Risk Zones</h1>".to_string()),
    };
    let note = section.and_then(|section| section.closing.as_deref());
    body.push_str(&render::prediction_form(forest, illnesses, note));

    let mut status = StatusCode::OK;
    if submitted {
        let outcome = inputs.and_then(|(forest, illnesses)| {
            state
                .inference
                .infer(FeatureRecord::from_inputs(forest, illnesses))
                .with_domain_check()
                .run()
                .map_err(ApiError::from)
        });
        match outcome {
            Ok(prediction) => {
                tracing::info!(
                    forest_loss_ha = forest,
                    reported_illnesses = illnesses,
                    label = %prediction.label,
                    "prediction served"
                );
                body.push_str(&render::prediction_result(&prediction));
            }
            Err(err) => {
                status = err.status();
                tracing::warn!(code = err.code(), "prediction rejected: {err}");
                body.push_str(&render::prediction_error(&err.to_string()));
            }
        }
    }
    body.push_str(&render::dataset_download());

    (status, Html(render::page(&state.catalog, slug, &body))).into_response()
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub forest_loss_ha: f64,
    /// Parsed loosely so negative or fractional counts reach the domain check.
    pub reported_illnesses: f64,
    #[serde(default)]
    pub explain: bool,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub label: RiskLabel,
    pub risk: u8,
    pub headline: &'static str,
    pub message: &'static str,
    pub record: FeatureRecord,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

pub(crate) async fn predict_api_handler(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))?;
    let illnesses = illness_count(request.reported_illnesses)?;
    let record = FeatureRecord::from_inputs(request.forest_loss_ha, illnesses);
    let job = state.inference.infer(record).with_domain_check();
    let (label, explanation) = if request.explain {
        let explanation = job.explain()?;
        (explanation.label, Some(explanation))
    } else {
        (job.run()?.label, None)
    };

    tracing::info!(
        forest_loss_ha = record.forest_cover_loss_ha,
        reported_illnesses = record.reported_illnesses,
        label = %label,
        "prediction served"
    );

    Ok(Json(PredictResponse {
        label,
        risk: label.class(),
        headline: label.headline(),
        message: label.message(),
        record,
        model: state.inference.id.clone(),
        explanation,
    }))
}

#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub digest: String,
    pub feature_names: Vec<String>,
    pub node_count: usize,
    pub leaf_count: usize,
    pub depth: usize,
}

impl ModelSummary {
    pub fn from_artifact(artifact: &ModelArtifact) -> Self {
        let manifest = artifact.manifest();
        let tree = artifact.tree();
        Self {
            id: artifact.id(),
            name: manifest.name.clone(),
            description: manifest.description.clone(),
            created_at: manifest.created_at.clone(),
            digest: manifest.digest.clone(),
            feature_names: tree.feature_names().to_vec(),
            node_count: tree.node_count(),
            leaf_count: tree.leaf_count(),
            depth: tree.depth(),
        }
    }
}

pub(crate) async fn model_handler(State(state): State<AppState>) -> Json<ModelSummary> {
    Json(ModelSummary::from_artifact(state.inference.model()))
}

pub(crate) async fn not_found_handler() -> ApiError {
    ApiError::NotFound("no such route".to_string())
}
