use std::fmt;
use std::str::FromStr;

/// How created projects reach the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerMode {
    /// Durable `pipeline_jobs` row consumed by `pagesmith-worker`.
    #[default]
    Queue,
    /// In-process task spawned right after creation.
    Inline,
}

impl FromStr for TriggerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queue" => Ok(Self::Queue),
            "inline" => Ok(Self::Inline),
            other => Err(format!("unknown trigger mode '{other}'")),
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Queue => "queue",
            Self::Inline => "inline",
        })
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub trigger_mode: TriggerMode,
    /// Let shared caches keep rendered pages for an hour. Off outside
    /// production so edits show up immediately.
    pub cache_pages: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec!["http://localhost:3000".into()],
            request_timeout_secs: 30,
            trigger_mode: TriggerMode::Queue,
            cache_pages: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `HOST`                 | `0.0.0.0`                |
    /// | `PORT`                 | `3000`                   |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                     |
    /// | `TRIGGER_MODE`         | `queue`                  |
    /// | `CACHE_PAGES`          | `false`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let trigger_mode: TriggerMode = std::env::var("TRIGGER_MODE")
            .unwrap_or_else(|_| "queue".into())
            .parse()
            .expect("TRIGGER_MODE must be one of: queue, inline");

        let cache_pages = pagesmith_pipeline::config::env_flag("CACHE_PAGES");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            trigger_mode,
            cache_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_mode_parses_case_insensitively() {
        assert_eq!("Queue".parse::<TriggerMode>(), Ok(TriggerMode::Queue));
        assert_eq!(" inline ".parse::<TriggerMode>(), Ok(TriggerMode::Inline));
        assert!("cron".parse::<TriggerMode>().is_err());
    }

    #[test]
    fn defaults_are_local_friendly() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.trigger_mode, TriggerMode::Queue);
        assert!(!config.cache_pages);
    }
}
