//! Handlers for the `/projects` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pagesmith_core::error::CoreError;
use pagesmith_core::project::{CreateProjectInput, ProjectDetail};
use pagesmith_core::types::DbId;
use pagesmith_pipeline::{create_project, CreatedProject};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/projects
///
/// Persists the project in `pending`, hands it to the pipeline and returns
/// without waiting for the run.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateProjectInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedProject>)> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let created = create_project(
        state.store.as_ref(),
        state.submitter.as_ref(),
        &state.pipeline,
        input,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/projects/{id}
///
/// Admin read: returns the project whatever its status or expiry.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let detail = state
        .store
        .find_detail(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", id))?;
    Ok(Json(detail))
}
