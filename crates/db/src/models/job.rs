//! Pipeline job rows: the durable record of a queued pipeline run.

use pagesmith_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::status::{JobStatus, StatusId};

/// A row from the `pipeline_jobs` table. One per project.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PipelineJob {
    pub id: DbId,
    pub project_id: DbId,
    pub status_id: StatusId,
    pub attempts: i32,
    pub worker_id: Option<String>,
    pub last_error: Option<String>,
    pub claimed_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PipelineJob {
    /// Decoded status, `None` if the row carries an unknown id.
    pub fn status(&self) -> Option<JobStatus> {
        JobStatus::from_id(self.status_id)
    }
}
