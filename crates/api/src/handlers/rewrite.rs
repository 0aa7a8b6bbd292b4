//! Handler for `POST /rewrite`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use pagesmith_ai::{RewriteField, RewriteRequest, RewriteResult};
use pagesmith_core::error::CoreError;
use pagesmith_core::field_path::split_section;
use pagesmith_core::project::{Language, Tone};
use pagesmith_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of `POST /rewrite`. `tone` and `language` fall back to the
/// project's own settings; `styleHints` falls back to the brand's style
/// notes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteInput {
    pub project_id: DbId,
    pub fields: Vec<RewriteField>,
    #[serde(default)]
    pub tone: Option<Tone>,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub style_hints: Option<String>,
}

/// POST /api/v1/rewrite
///
/// Returns one rewrite per input field, in input order. Nothing is
/// persisted; the client applies accepted rewrites through the sections
/// endpoints.
pub async fn rewrite(
    State(state): State<AppState>,
    payload: Result<Json<RewriteInput>, JsonRejection>,
) -> AppResult<Json<RewriteResult>> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    for field in &input.fields {
        split_section(&field.path)?;
    }

    let project = state
        .store
        .find_project(input.project_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", input.project_id))?;

    let style_hints = match input.style_hints.filter(|h| !h.trim().is_empty()) {
        Some(hints) => Some(hints),
        None => state
            .store
            .find_brand_style(project.id)
            .await?
            .and_then(|brand| brand.style_notes),
    };

    let request = RewriteRequest {
        fields: input.fields,
        tone: input.tone.unwrap_or(project.tone),
        language: input
            .language
            .unwrap_or_else(|| project.locale.resolve(None, state.pipeline.default_language)),
        style_hints,
        client_name: project.client_name,
    };

    let result = state.rewrite.rewrite(&request).await?;
    tracing::info!(
        project_id = project.id,
        fields = result.rewrites.len(),
        warnings = result.warnings.len(),
        "Rewrite served",
    );
    Ok(Json(result))
}
