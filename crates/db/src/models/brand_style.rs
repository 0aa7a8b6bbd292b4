//! Row model for the `brand_styles` table.

use pagesmith_core::project::BrandStyle;
use pagesmith_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `brand_styles` table. One per project.
#[derive(Debug, Clone, FromRow)]
pub struct BrandStyleRow {
    pub id: DbId,
    pub project_id: DbId,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub font_families: Vec<String>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub style_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<BrandStyleRow> for BrandStyle {
    fn from(row: BrandStyleRow) -> Self {
        BrandStyle {
            primary_color: row.primary_color,
            secondary_color: row.secondary_color,
            accent_color: row.accent_color,
            font_families: row.font_families,
            logo_url: row.logo_url,
            favicon_url: row.favicon_url,
            style_notes: row.style_notes,
        }
    }
}
