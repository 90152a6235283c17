//! Axum route handlers for the relay and server-side extraction.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::normalizer::normalize;
use crate::extraction::prompts::build_extraction_prompt;
use crate::extraction::ExtractionResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    /// Not validated; an absent field relays an empty description.
    #[serde(default)]
    pub job_description: String,
}

/// POST /api/claude
///
/// Forwards the description to the Messages API and returns the upstream body as-is.
pub async fn handle_relay(
    State(state): State<AppState>,
    Json(request): Json<RelayRequest>,
) -> Result<Json<Value>, AppError> {
    info!(
        "Relaying job description ({} bytes)",
        request.job_description.len()
    );

    let prompt = build_extraction_prompt(&request.job_description);
    let envelope = state.llm.call_raw(&prompt).await?;

    Ok(Json(envelope))
}

/// Any method other than POST on the relay route.
pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// POST /api/v1/applications/parse
///
/// Relay plus normalizer in one call, for shells that want the prefill directly.
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(request): Json<RelayRequest>,
) -> Result<Json<ExtractionResult>, AppError> {
    let prompt = build_extraction_prompt(&request.job_description);
    let envelope = state.llm.call_raw(&prompt).await?;

    Ok(Json(normalize(&envelope)?))
}
