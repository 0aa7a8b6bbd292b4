//! Handlers for `/projects/{id}/sections`.
//!
//! Concurrent writers are not coordinated: the last write wins.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use pagesmith_core::error::CoreError;
use pagesmith_core::field_path::apply_full_path;
use pagesmith_core::project::Page;
use pagesmith_core::sections::SectionsDocument;
use pagesmith_core::types::DbId;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of `PATCH /projects/{id}/sections`.
#[derive(Debug, Deserialize)]
pub struct PatchSectionInput {
    /// Full field path, e.g. `howItWorks.steps.2.title`.
    pub path: String,
    pub value: Value,
}

async fn load_page(state: &AppState, id: DbId) -> AppResult<Page> {
    if state.store.find_project(id).await?.is_none() {
        return Err(CoreError::not_found("Project", id).into());
    }
    let page = state
        .store
        .find_page(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Page", id))?;
    Ok(page)
}

async fn store_sections(state: &AppState, id: DbId, sections: &SectionsDocument) -> AppResult<Page> {
    let page = state
        .store
        .replace_sections(id, sections)
        .await?
        .ok_or_else(|| CoreError::not_found("Page", id))?;
    Ok(page)
}

/// GET /api/v1/projects/{id}/sections
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SectionsDocument>> {
    let page = load_page(&state, id).await?;
    Ok(Json(page.sections))
}

/// PUT /api/v1/projects/{id}/sections
///
/// Replaces the whole document. Every present section must match its
/// schema; absent sections are allowed.
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Page>> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let sections = SectionsDocument::from_value(body)?;
    load_page(&state, id).await?;

    let page = store_sections(&state, id, &sections).await?;
    tracing::info!(project_id = id, "Sections replaced");
    Ok(Json(page))
}

/// PATCH /api/v1/projects/{id}/sections
///
/// Sets one leaf addressed by a field path and stores the result.
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Result<Json<PatchSectionInput>, JsonRejection>,
) -> AppResult<Json<Page>> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let current = load_page(&state, id).await?;
    let patched = apply_full_path(&current.sections, &input.path, input.value)?;

    let page = store_sections(&state, id, &patched).await?;
    tracing::info!(project_id = id, path = %input.path, "Section field updated");
    Ok(Json(page))
}
