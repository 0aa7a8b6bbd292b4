//! Bounded status polling.
//!
//! Polling is a plain read; it never changes state. A pipeline that died
//! mid-run shows up as [`PollOutcome::TimedOut`] with the project still
//! `pending`.

use std::sync::Arc;
use std::time::Duration;

use pagesmith_core::project::{Project, ProjectStatus};
use pagesmith_core::types::DbId;
use pagesmith_db::{ProjectStore, StoreError};
use tokio_util::sync::CancellationToken;

/// Interval between status reads.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Reads before giving up (three minutes at the default interval).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 90;

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The project reached `ready` or `error`.
    Terminal(Project),
    /// Attempts ran out with the project still in `last_status`.
    TimedOut { last_status: ProjectStatus },
    NotFound,
    Cancelled,
}

/// Polls a project at a fixed interval until its status is terminal.
pub struct StatusPoller {
    store: Arc<dyn ProjectStore>,
    interval: Duration,
    max_attempts: u32,
}

impl StatusPoller {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self {
            store,
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub async fn wait_for_terminal(
        &self,
        project_id: DbId,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome, StoreError> {
        let mut last_status = ProjectStatus::Pending;
        for attempt in 1..=self.max_attempts {
            let Some(project) = self.store.find_project(project_id).await? else {
                return Ok(PollOutcome::NotFound);
            };
            if project.status.is_terminal() {
                tracing::debug!(project_id, attempt, status = %project.status, "Project reached terminal status");
                return Ok(PollOutcome::Terminal(project));
            }
            last_status = project.status;

            if attempt == self.max_attempts {
                break;
            }
            tokio::select! {
                _ = cancel.cancelled() => return Ok(PollOutcome::Cancelled),
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
        tracing::warn!(project_id, attempts = self.max_attempts, "Gave up waiting for project");
        Ok(PollOutcome::TimedOut { last_status })
    }
}
