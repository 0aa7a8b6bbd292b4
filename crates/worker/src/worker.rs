//! Job claim loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pagesmith_core::error::CoreError;
use pagesmith_db::models::job::PipelineJob;
use pagesmith_db::{ProjectStore, StoreError};
use pagesmith_pipeline::{Orchestrator, PipelineError, PipelineOutcome};
use tokio::sync::Semaphore;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::WorkerConfig;

/// Claims queued pipeline jobs and runs them on a bounded set of tasks.
///
/// Each claimed job runs through [`Orchestrator::run_isolated`], so a
/// panicking pipeline marks its own project as failed and never takes the
/// worker down.
pub struct JobWorker {
    store: Arc<dyn ProjectStore>,
    orchestrator: Arc<Orchestrator>,
    config: WorkerConfig,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
}

impl JobWorker {
    pub fn new(orchestrator: Arc<Orchestrator>, config: WorkerConfig) -> Self {
        Self {
            store: Arc::clone(orchestrator.store()),
            permits: Arc::new(Semaphore::new(config.concurrency.max(1))),
            orchestrator,
            config,
            tracker: TaskTracker::new(),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Pipelines currently running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Run the claim loop until the cancellation token is triggered.
    ///
    /// Returns without waiting for in-flight pipelines; call
    /// [`drain`](Self::drain) for that.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut poll = tokio::time::interval(self.config.poll_interval());
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut reap = tokio::time::interval(self.config.reap_interval());
        reap.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            worker_id = %self.config.worker_id,
            poll_interval_ms = self.config.poll_interval_ms,
            concurrency = self.config.concurrency,
            "Job worker started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Job worker shutting down");
                    break;
                }
                _ = reap.tick() => {
                    if let Err(e) = self.requeue_stale().await {
                        tracing::error!(error = %e, "Stale job sweep failed");
                    }
                }
                _ = poll.tick() => {
                    if let Err(e) = self.dispatch().await {
                        tracing::error!(error = %e, "Dispatch cycle failed");
                    }
                }
            }
        }
    }

    /// One dispatch cycle: claim jobs while there is spare capacity.
    /// Returns the number of jobs claimed.
    pub async fn dispatch(&self) -> Result<usize, StoreError> {
        let mut claimed = 0;
        while let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() {
            let Some(job) = self.store.claim_next_job(&self.config.worker_id).await? else {
                break;
            };
            tracing::info!(
                job_id = job.id,
                project_id = job.project_id,
                attempt = job.attempts,
                "Pipeline job claimed",
            );
            claimed += 1;

            let store = Arc::clone(&self.store);
            let orchestrator = Arc::clone(&self.orchestrator);
            self.tracker.spawn(async move {
                process_job(store.as_ref(), &orchestrator, &job).await;
                drop(permit);
            });
        }
        Ok(claimed)
    }

    /// Put abandoned `running` jobs back in the queue.
    pub async fn requeue_stale(&self) -> Result<u64, StoreError> {
        let cutoff = Utc::now() - self.config.stale_after();
        let requeued = self.store.requeue_stale_jobs(cutoff).await?;
        if requeued > 0 {
            tracing::warn!(requeued, "Requeued stale pipeline jobs");
        }
        Ok(requeued)
    }

    /// Stop spawning and wait up to `timeout` for in-flight pipelines.
    /// Returns `true` if everything finished in time. Jobs still running
    /// afterwards are picked up again by the stale sweep.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.tracker.close();
        tokio::time::timeout(timeout, self.tracker.wait()).await.is_ok()
    }
}

async fn process_job(store: &dyn ProjectStore, orchestrator: &Orchestrator, job: &PipelineJob) {
    let recorded = match orchestrator.run_isolated(job.project_id).await {
        Ok(PipelineOutcome::Ready { .. }) => store.complete_job(job.id).await,
        Ok(PipelineOutcome::Skipped { status }) => {
            tracing::info!(job_id = job.id, status = %status, "Project already settled, closing job");
            store.complete_job(job.id).await
        }
        Ok(PipelineOutcome::Failed { message }) => store.fail_job(job.id, &message).await,
        Err(PipelineError::Core(CoreError::NotFound { .. })) => {
            store.fail_job(job.id, "Project no longer exists").await
        }
        Err(e) => {
            tracing::error!(
                job_id = job.id,
                project_id = job.project_id,
                error = %e,
                "Pipeline run could not record its result, leaving job for the stale sweep",
            );
            return;
        }
    };

    match recorded {
        Ok(()) => tracing::info!(job_id = job.id, project_id = job.project_id, "Pipeline job finished"),
        Err(e) => tracing::error!(job_id = job.id, error = %e, "Failed to record pipeline job result"),
    }
}
