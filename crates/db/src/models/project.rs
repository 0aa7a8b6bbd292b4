//! Row model for the `projects` table.

use pagesmith_core::project::{Locale, Project, Tone};
use pagesmith_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::status::{ProjectStatusId, StatusId};
use crate::store::StoreError;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: DbId,
    pub slug: String,
    pub client_name: String,
    pub source_url: String,
    pub template_key: String,
    pub tone: String,
    pub locale: String,
    pub status_id: StatusId,
    pub error_message: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let status = ProjectStatusId::from_id(row.status_id).ok_or_else(|| {
            StoreError::Corrupt(format!("project {} has unknown status_id {}", row.id, row.status_id))
        })?;
        let tone: Tone = row
            .tone
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("project {} has unknown tone '{}'", row.id, row.tone)))?;
        let locale: Locale = row.locale.parse().map_err(|_| {
            StoreError::Corrupt(format!("project {} has unknown locale '{}'", row.id, row.locale))
        })?;

        Ok(Project {
            id: row.id,
            slug: row.slug,
            client_name: row.client_name,
            source_url: row.source_url,
            template_key: row.template_key,
            tone,
            locale,
            status: status.into(),
            error_message: row.error_message,
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
