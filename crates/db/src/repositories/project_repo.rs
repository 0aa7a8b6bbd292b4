//! Repository for the `projects` table.

use pagesmith_core::project::NewProject;
use pagesmith_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::ProjectRow;
use crate::models::status::ProjectStatusId;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, client_name, source_url, template_key, tone, locale, \
    status_id, error_message, expires_at, created_at, updated_at";

/// Provides persistence operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project in `pending`, returning the created row.
    ///
    /// A slug collision surfaces as a unique violation on `uq_projects_slug`.
    pub async fn create(pool: &PgPool, input: &NewProject) -> Result<ProjectRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (slug, client_name, source_url, template_key, tone, locale, status_id, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&input.slug)
            .bind(&input.client_name)
            .bind(&input.source_url)
            .bind(&input.template_key)
            .bind(input.tone.as_str())
            .bind(input.locale.as_str())
            .bind(ProjectStatusId::Pending.id())
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE slug = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Every slug in use, for collision-free slug generation.
    pub async fn list_slugs(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT slug FROM projects")
            .fetch_all(pool)
            .await
    }

    /// Move a pending project to `ready` and record the resolved template.
    ///
    /// Only succeeds while the project is still pending and a page row
    /// exists. Returns `false` otherwise.
    pub async fn mark_ready(pool: &PgPool, id: DbId, template_key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects
             SET status_id = $2, template_key = $3, error_message = NULL
             WHERE id = $1 AND status_id = $4
               AND EXISTS (SELECT 1 FROM pages WHERE pages.project_id = projects.id)",
        )
        .bind(id)
        .bind(ProjectStatusId::Ready.id())
        .bind(template_key)
        .bind(ProjectStatusId::Pending.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a pending project to `error` with a reason. Returns `false` if
    /// the project is missing or already terminal.
    pub async fn mark_error(pool: &PgPool, id: DbId, message: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET status_id = $2, error_message = $3
             WHERE id = $1 AND status_id = $4",
        )
        .bind(id)
        .bind(ProjectStatusId::Error.id())
        .bind(message)
        .bind(ProjectStatusId::Pending.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
