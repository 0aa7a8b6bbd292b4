//! The storage seam used by the pipeline, the worker and the API.

use async_trait::async_trait;
use pagesmith_core::project::{BrandStyle, NewProject, Page, Project, ProjectDetail};
use pagesmith_core::sections::SectionsDocument;
use pagesmith_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::job::PipelineJob;
use crate::repositories::{BrandStyleRepo, PageRepo, PipelineJobRepo, ProjectRepo};

/// Postgres SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back to a domain value.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// A uniqueness constraint was violated (e.g. a slug taken concurrently).
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Persistence operations over projects and everything they own.
///
/// Status writes are conditional: [`mark_ready`](Self::mark_ready) and
/// [`mark_error`](Self::mark_error) only move a project out of `pending`
/// and report whether they did, so a terminal status is never overwritten.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Every slug currently in use.
    async fn list_slugs(&self) -> Result<Vec<String>, StoreError>;

    /// Insert a project in `pending`. A taken slug yields
    /// [`StoreError::Conflict`].
    async fn create_project(&self, input: &NewProject) -> Result<Project, StoreError>;

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, StoreError>;

    async fn find_project_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError>;

    async fn find_brand_style(&self, project_id: DbId) -> Result<Option<BrandStyle>, StoreError>;

    /// Insert or replace the brand style of a project.
    async fn save_brand_style(
        &self,
        project_id: DbId,
        style: &BrandStyle,
    ) -> Result<BrandStyle, StoreError>;

    async fn find_page(&self, project_id: DbId) -> Result<Option<Page>, StoreError>;

    /// Insert or replace the page of a project.
    async fn save_page(
        &self,
        project_id: DbId,
        sections: &SectionsDocument,
    ) -> Result<Page, StoreError>;

    /// Replace the sections of an existing page. `None` if there is no page.
    async fn replace_sections(
        &self,
        project_id: DbId,
        sections: &SectionsDocument,
    ) -> Result<Option<Page>, StoreError>;

    /// `pending -> ready`, recording the resolved template key. Requires a
    /// page to exist.
    async fn mark_ready(&self, id: DbId, template_key: &str) -> Result<bool, StoreError>;

    /// `pending -> error`, recording the reason.
    async fn mark_error(&self, id: DbId, message: &str) -> Result<bool, StoreError>;

    /// Queue a pipeline run. Idempotent per project.
    async fn enqueue_job(&self, project_id: DbId) -> Result<PipelineJob, StoreError>;

    /// Claim the oldest queued job, marking it running.
    async fn claim_next_job(&self, worker_id: &str) -> Result<Option<PipelineJob>, StoreError>;

    async fn complete_job(&self, job_id: DbId) -> Result<(), StoreError>;

    async fn fail_job(&self, job_id: DbId, error: &str) -> Result<(), StoreError>;

    /// Requeue running jobs claimed before `claimed_before`.
    async fn requeue_stale_jobs(&self, claimed_before: Timestamp) -> Result<u64, StoreError>;

    async fn find_job(&self, project_id: DbId) -> Result<Option<PipelineJob>, StoreError>;

    /// A project with its brand style and page.
    async fn find_detail(&self, id: DbId) -> Result<Option<ProjectDetail>, StoreError> {
        let Some(project) = self.find_project(id).await? else {
            return Ok(None);
        };
        let brand_style = self.find_brand_style(id).await?;
        let page = self.find_page(id).await?;
        Ok(Some(ProjectDetail {
            project,
            brand_style,
            page,
        }))
    }
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// [`ProjectStore`] backed by the Postgres repositories.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn list_slugs(&self) -> Result<Vec<String>, StoreError> {
        Ok(ProjectRepo::list_slugs(&self.pool).await?)
    }

    async fn create_project(&self, input: &NewProject) -> Result<Project, StoreError> {
        match ProjectRepo::create(&self.pool, input).await {
            Ok(row) => row.try_into(),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict(format!(
                "slug '{}' is already taken",
                input.slug
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, StoreError> {
        ProjectRepo::find_by_id(&self.pool, id)
            .await?
            .map(Project::try_from)
            .transpose()
    }

    async fn find_project_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError> {
        ProjectRepo::find_by_slug(&self.pool, slug)
            .await?
            .map(Project::try_from)
            .transpose()
    }

    async fn find_brand_style(&self, project_id: DbId) -> Result<Option<BrandStyle>, StoreError> {
        Ok(BrandStyleRepo::find_by_project(&self.pool, project_id)
            .await?
            .map(BrandStyle::from))
    }

    async fn save_brand_style(
        &self,
        project_id: DbId,
        style: &BrandStyle,
    ) -> Result<BrandStyle, StoreError> {
        Ok(BrandStyleRepo::upsert(&self.pool, project_id, style).await?.into())
    }

    async fn find_page(&self, project_id: DbId) -> Result<Option<Page>, StoreError> {
        PageRepo::find_by_project(&self.pool, project_id)
            .await?
            .map(Page::try_from)
            .transpose()
    }

    async fn save_page(
        &self,
        project_id: DbId,
        sections: &SectionsDocument,
    ) -> Result<Page, StoreError> {
        PageRepo::upsert(&self.pool, project_id, &sections.to_value())
            .await?
            .try_into()
    }

    async fn replace_sections(
        &self,
        project_id: DbId,
        sections: &SectionsDocument,
    ) -> Result<Option<Page>, StoreError> {
        PageRepo::replace_sections(&self.pool, project_id, &sections.to_value())
            .await?
            .map(Page::try_from)
            .transpose()
    }

    async fn mark_ready(&self, id: DbId, template_key: &str) -> Result<bool, StoreError> {
        Ok(ProjectRepo::mark_ready(&self.pool, id, template_key).await?)
    }

    async fn mark_error(&self, id: DbId, message: &str) -> Result<bool, StoreError> {
        Ok(ProjectRepo::mark_error(&self.pool, id, message).await?)
    }

    async fn enqueue_job(&self, project_id: DbId) -> Result<PipelineJob, StoreError> {
        Ok(PipelineJobRepo::enqueue(&self.pool, project_id).await?)
    }

    async fn claim_next_job(&self, worker_id: &str) -> Result<Option<PipelineJob>, StoreError> {
        Ok(PipelineJobRepo::claim_next(&self.pool, worker_id).await?)
    }

    async fn complete_job(&self, job_id: DbId) -> Result<(), StoreError> {
        Ok(PipelineJobRepo::complete(&self.pool, job_id).await?)
    }

    async fn fail_job(&self, job_id: DbId, error: &str) -> Result<(), StoreError> {
        Ok(PipelineJobRepo::fail(&self.pool, job_id, error).await?)
    }

    async fn requeue_stale_jobs(&self, claimed_before: Timestamp) -> Result<u64, StoreError> {
        Ok(PipelineJobRepo::requeue_stale(&self.pool, claimed_before).await?)
    }

    async fn find_job(&self, project_id: DbId) -> Result<Option<PipelineJob>, StoreError> {
        Ok(PipelineJobRepo::find_by_project(&self.pool, project_id).await?)
    }
}
