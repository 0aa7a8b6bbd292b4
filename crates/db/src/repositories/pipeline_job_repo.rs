//! Repository for the `pipeline_jobs` table.
//!
//! Status literals always come from [`JobStatus`].

use pagesmith_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::job::PipelineJob;
use crate::models::status::JobStatus;

const COLUMNS: &str = "id, project_id, status_id, attempts, worker_id, last_error, \
    claimed_at, completed_at, created_at, updated_at";

/// Provides queue operations for pipeline jobs.
pub struct PipelineJobRepo;

impl PipelineJobRepo {
    /// Queue a pipeline run for a project.
    ///
    /// Idempotent: a second enqueue for the same project returns the
    /// existing job untouched.
    pub async fn enqueue(pool: &PgPool, project_id: DbId) -> Result<PipelineJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO pipeline_jobs (project_id, status_id) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_pipeline_jobs_project_id
             DO UPDATE SET project_id = EXCLUDED.project_id
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PipelineJob>(&query)
            .bind(project_id)
            .bind(JobStatus::Queued.id())
            .fetch_one(pool)
            .await
    }

    /// Atomically claim the oldest queued job for a worker.
    ///
    /// Uses `SELECT FOR UPDATE SKIP LOCKED` so concurrent workers never
    /// claim the same row.
    pub async fn claim_next(pool: &PgPool, worker_id: &str) -> Result<Option<PipelineJob>, sqlx::Error> {
        let query = format!(
            "UPDATE pipeline_jobs
             SET worker_id = $1, claimed_at = NOW(), status_id = $2, attempts = attempts + 1
             WHERE id = (
                 SELECT id FROM pipeline_jobs
                 WHERE status_id = $3
                 ORDER BY created_at ASC, id ASC
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PipelineJob>(&query)
            .bind(worker_id)
            .bind(JobStatus::Running.id())
            .bind(JobStatus::Queued.id())
            .fetch_optional(pool)
            .await
    }

    pub async fn complete(pool: &PgPool, job_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE pipeline_jobs SET status_id = $2, completed_at = NOW(), last_error = NULL
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(JobStatus::Done.id())
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn fail(pool: &PgPool, job_id: DbId, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE pipeline_jobs SET status_id = $2, completed_at = NOW(), last_error = $3
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(JobStatus::Failed.id())
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Put running jobs claimed before `claimed_before` back in the queue.
    ///
    /// Recovers work from workers that died mid-run. Returns the number of
    /// requeued jobs.
    pub async fn requeue_stale(pool: &PgPool, claimed_before: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE pipeline_jobs SET status_id = $1, worker_id = NULL, claimed_at = NULL
             WHERE status_id = $2 AND claimed_at < $3",
        )
        .bind(JobStatus::Queued.id())
        .bind(JobStatus::Running.id())
        .bind(claimed_before)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<PipelineJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pipeline_jobs WHERE project_id = $1");
        sqlx::query_as::<_, PipelineJob>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }
}
