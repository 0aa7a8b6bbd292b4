//! Row model for the `pages` table.

use pagesmith_core::project::Page;
use pagesmith_core::sections::SectionsDocument;
use pagesmith_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::store::StoreError;

/// A row from the `pages` table. `sections` is the JSONB document.
#[derive(Debug, Clone, FromRow)]
pub struct PageRow {
    pub id: DbId,
    pub project_id: DbId,
    pub sections: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<PageRow> for Page {
    type Error = StoreError;

    fn try_from(row: PageRow) -> Result<Self, Self::Error> {
        let sections = SectionsDocument::from_value(row.sections).map_err(|e| {
            StoreError::Corrupt(format!("page for project {} does not parse: {e}", row.project_id))
        })?;
        Ok(Page {
            project_id: row.project_id,
            sections,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
