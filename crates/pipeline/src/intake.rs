//! Project creation: validate, pick a slug, persist in `pending`, trigger.

use chrono::Utc;
use pagesmith_core::project::{CreateProjectInput, NewProject, ProjectStatus};
use pagesmith_core::slug::generate_slug;
use pagesmith_core::types::DbId;
use pagesmith_db::{ProjectStore, StoreError};
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::submitter::JobSubmitter;

/// Attempts at inserting with a fresh slug when a concurrent request took
/// the one we generated.
const MAX_SLUG_ATTEMPTS: usize = 5;

/// Immediate response to a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProject {
    pub project_id: DbId,
    pub slug: String,
    pub status: ProjectStatus,
}

/// Create a project and hand it to the pipeline.
///
/// Returns as soon as the run is scheduled. If scheduling fails the
/// project is moved to `error` so it does not sit in `pending`.
pub async fn create_project(
    store: &dyn ProjectStore,
    submitter: &dyn JobSubmitter,
    config: &PipelineConfig,
    input: CreateProjectInput,
) -> Result<CreatedProject, PipelineError> {
    input.check()?;

    let now = Utc::now();
    let client_name = input.client_name.trim().to_string();
    let mut attempt = 0;
    let project = loop {
        attempt += 1;
        let existing = store.list_slugs().await?;
        let new_project = NewProject {
            slug: generate_slug(&client_name, &existing),
            client_name: client_name.clone(),
            source_url: input.source_url.trim().to_string(),
            template_key: input.template_key.trim().to_string(),
            tone: input.tone,
            locale: input.locale,
            expires_at: config.expiry_for(now),
        };
        match store.create_project(&new_project).await {
            Ok(project) => break project,
            Err(StoreError::Conflict(msg)) if attempt < MAX_SLUG_ATTEMPTS => {
                tracing::debug!(attempt, reason = %msg, "Slug taken concurrently, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    };

    tracing::info!(
        project_id = project.id,
        slug = %project.slug,
        expires_at = ?project.expires_at,
        "Project created",
    );

    if let Err(e) = submitter.submit(project.id).await {
        tracing::error!(project_id = project.id, mode = submitter.mode(), error = %e, "Failed to trigger pipeline");
        store
            .mark_error(project.id, &format!("Pipeline could not be started: {e}"))
            .await?;
        return Err(e.into());
    }

    Ok(CreatedProject {
        project_id: project.id,
        slug: project.slug,
        status: project.status,
    })
}
