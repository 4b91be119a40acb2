use axum::{
    extract::{rejection::JsonRejection, Form, State},
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api_errors::AppError;
use crate::app_state::AppState;
use crate::encoder::PredictionInput;
use crate::form_controller::{handle_submission, FormState, SubmittedFields};
use crate::options::DropdownOptions;
use crate::predictor::predict_arancel;
use crate::render::render_page;

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction_id: Uuid,
    pub arancel: f64,
    pub computed_at: DateTime<Utc>,
}

/// Build the router: the HTML form at `/`, the JSON API, and health checks.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // form
        .route("/", get(show_form).post(submit_form))
        // JSON API
        .route("/api/predict", post(predict_json))
        .route("/api/options", get(options))
        // health endpoints
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn show_form(State(st): State<Arc<AppState>>) -> Html<String> {
    let state = FormState::idle(st.default_values());
    Html(render_page(&state, &st.artifacts.options))
}

#[axum::debug_handler]
async fn submit_form(
    State(st): State<Arc<AppState>>,
    Form(fields): Form<SubmittedFields>,
) -> Html<String> {
    let prior = st.default_values();
    let state = handle_submission(&st.artifacts, &prior, &fields);
    Html(render_page(&state, &st.artifacts.options))
}

#[axum::debug_handler]
async fn predict_json(
    State(st): State<Arc<AppState>>,
    payload: Result<Json<PredictionInput>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    // serde_json refuses out-of-range numbers, so terreno is finite here
    let Json(input) = payload.map_err(|rejection| {
        tracing::debug!("rejected json payload: {}", rejection.body_text());
        AppError::bad_request(rejection.body_text())
    })?;

    let prediction_id = Uuid::new_v4();
    let arancel = predict_arancel(&st.artifacts, &input).map_err(|e| {
        tracing::error!(%prediction_id, "prediction failed: {e}");
        AppError::from(e)
    })?;
    tracing::debug!(%prediction_id, arancel, "json prediction served");

    Ok(Json(PredictResponse {
        prediction_id,
        arancel,
        computed_at: Utc::now(),
    }))
}

async fn options(State(st): State<Arc<AppState>>) -> Json<DropdownOptions> {
    Json(st.artifacts.options.clone())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn readyz(State(st): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ready": true,
        "model": st.artifacts.model.kind(),
        "model_fingerprint": st.artifacts.model_fingerprint,
        "n_features": st.artifacts.schema.len(),
    }))
}
