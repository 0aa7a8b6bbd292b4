use std::time::Duration;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Recorded on claimed jobs.
    pub worker_id: String,
    pub poll_interval_ms: u64,
    /// Maximum pipelines running at once in this process.
    pub concurrency: usize,
    /// A `running` job claimed longer ago than this is considered abandoned.
    pub stale_after_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            worker_id: default_worker_id(),
            poll_interval_ms: 1000,
            concurrency: 4,
            stale_after_secs: 600,
        }
    }
}

fn default_worker_id() -> String {
    format!("worker-{}", std::process::id())
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default          |
    /// |---------------------------|------------------|
    /// | `WORKER_ID`               | `worker-<pid>`   |
    /// | `WORKER_POLL_INTERVAL_MS` | `1000`           |
    /// | `WORKER_CONCURRENCY`      | `4`              |
    /// | `WORKER_STALE_AFTER_SECS` | `600`            |
    pub fn from_env() -> Self {
        let worker_id = std::env::var("WORKER_ID").unwrap_or_else(|_| default_worker_id());

        let poll_interval_ms: u64 = std::env::var("WORKER_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("WORKER_POLL_INTERVAL_MS must be a valid u64");

        let concurrency: usize = std::env::var("WORKER_CONCURRENCY")
            .unwrap_or_else(|_| "4".into())
            .parse()
            .expect("WORKER_CONCURRENCY must be a valid usize");

        let stale_after_secs: u64 = std::env::var("WORKER_STALE_AFTER_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("WORKER_STALE_AFTER_SECS must be a valid u64");

        Self {
            worker_id,
            poll_interval_ms,
            concurrency: concurrency.max(1),
            stale_after_secs,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// How often abandoned claims are swept: half the stale threshold,
    /// at least once a second.
    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs((self.stale_after_secs / 2).max(1))
    }

    pub fn stale_after(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.stale_after_secs.min(u64::from(u32::MAX)) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.reap_interval(), Duration::from_secs(300));
        assert_eq!(config.stale_after(), chrono::Duration::minutes(10));
        assert!(config.worker_id.starts_with("worker-"));
    }

    #[test]
    fn reap_interval_has_a_floor() {
        let config = WorkerConfig {
            stale_after_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.reap_interval(), Duration::from_secs(1));
        assert_eq!(config.stale_after(), chrono::Duration::zero());
    }
}
