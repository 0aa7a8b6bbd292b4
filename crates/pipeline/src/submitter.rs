//! Trigger modes for the pipeline.
//!
//! Both implementations are called right after a project is created and
//! return as soon as the run is scheduled. Neither waits for completion.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pagesmith_core::types::DbId;
use pagesmith_db::ProjectStore;
use tokio_util::task::TaskTracker;

use crate::error::SubmitError;
use crate::orchestrator::{Orchestrator, PipelineOutcome};

/// Schedules one pipeline run per created project.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    async fn submit(&self, project_id: DbId) -> Result<(), SubmitError>;

    /// Short name for logs and health output.
    fn mode(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Inline
// ---------------------------------------------------------------------------

/// Fire-and-forget: runs the pipeline on a Tokio task in this process.
///
/// Runs are lost if the process dies mid-flight; the project then stays
/// `pending` until a poller gives up on it.
pub struct InlineSubmitter {
    orchestrator: Arc<Orchestrator>,
    tracker: TaskTracker,
}

impl InlineSubmitter {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            tracker: TaskTracker::new(),
        }
    }

    /// Number of runs still in flight.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting runs and wait up to `timeout` for in-flight ones.
    /// Returns `true` if everything finished in time.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.tracker.close();
        tokio::time::timeout(timeout, self.tracker.wait()).await.is_ok()
    }
}

#[async_trait]
impl JobSubmitter for InlineSubmitter {
    async fn submit(&self, project_id: DbId) -> Result<(), SubmitError> {
        if self.tracker.is_closed() {
            return Err(SubmitError::ShuttingDown);
        }
        let orchestrator = Arc::clone(&self.orchestrator);
        self.tracker.spawn(async move {
            match orchestrator.run_isolated(project_id).await {
                Ok(PipelineOutcome::Ready { .. }) | Ok(PipelineOutcome::Skipped { .. }) => {}
                Ok(PipelineOutcome::Failed { message }) => {
                    tracing::warn!(project_id, error = %message, "Inline pipeline run failed");
                }
                Err(e) => {
                    tracing::error!(project_id, error = %e, "Inline pipeline run could not record its result");
                }
            }
        });
        tracing::debug!(project_id, "Pipeline run spawned inline");
        Ok(())
    }

    fn mode(&self) -> &'static str {
        "inline"
    }
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

/// Durable: writes a `pipeline_jobs` row for the worker to claim.
pub struct QueueSubmitter {
    store: Arc<dyn ProjectStore>,
}

impl QueueSubmitter {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl JobSubmitter for QueueSubmitter {
    async fn submit(&self, project_id: DbId) -> Result<(), SubmitError> {
        let job = self.store.enqueue_job(project_id).await?;
        tracing::info!(project_id, job_id = job.id, "Pipeline job queued");
        Ok(())
    }

    fn mode(&self) -> &'static str {
        "queue"
    }
}
