//! Repository for the `brand_styles` table.

use pagesmith_core::project::BrandStyle;
use pagesmith_core::types::DbId;
use sqlx::PgPool;

use crate::models::brand_style::BrandStyleRow;

const COLUMNS: &str = "id, project_id, primary_color, secondary_color, accent_color, \
    font_families, logo_url, favicon_url, style_notes, created_at, updated_at";

/// Provides persistence operations for brand styles.
pub struct BrandStyleRepo;

impl BrandStyleRepo {
    /// Insert or replace the brand style owned by a project.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        style: &BrandStyle,
    ) -> Result<BrandStyleRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO brand_styles
                (project_id, primary_color, secondary_color, accent_color,
                 font_families, logo_url, favicon_url, style_notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT ON CONSTRAINT uq_brand_styles_project_id DO UPDATE SET
                primary_color = EXCLUDED.primary_color,
                secondary_color = EXCLUDED.secondary_color,
                accent_color = EXCLUDED.accent_color,
                font_families = EXCLUDED.font_families,
                logo_url = EXCLUDED.logo_url,
                favicon_url = EXCLUDED.favicon_url,
                style_notes = EXCLUDED.style_notes
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BrandStyleRow>(&query)
            .bind(project_id)
            .bind(&style.primary_color)
            .bind(&style.secondary_color)
            .bind(&style.accent_color)
            .bind(&style.font_families)
            .bind(&style.logo_url)
            .bind(&style.favicon_url)
            .bind(&style.style_notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<BrandStyleRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brand_styles WHERE project_id = $1");
        sqlx::query_as::<_, BrandStyleRow>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }
}
