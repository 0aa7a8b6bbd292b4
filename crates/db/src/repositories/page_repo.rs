//! Repository for the `pages` table.

use pagesmith_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::PageRow;

const COLUMNS: &str = "id, project_id, sections, created_at, updated_at";

/// Provides persistence operations for pages.
pub struct PageRepo;

impl PageRepo {
    /// Insert or replace the page owned by a project.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        sections: &serde_json::Value,
    ) -> Result<PageRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages (project_id, sections) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_pages_project_id
             DO UPDATE SET sections = EXCLUDED.sections
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageRow>(&query)
            .bind(project_id)
            .bind(sections)
            .fetch_one(pool)
            .await
    }

    /// Replace the sections of an existing page. Returns `None` if the
    /// project has no page yet.
    pub async fn replace_sections(
        pool: &PgPool,
        project_id: DbId,
        sections: &serde_json::Value,
    ) -> Result<Option<PageRow>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET sections = $2 WHERE project_id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageRow>(&query)
            .bind(project_id)
            .bind(sections)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<PageRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE project_id = $1");
        sqlx::query_as::<_, PageRow>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }
}
