use std::time::Duration;

/// Default `User-Agent` sent when fetching client sites.
pub const DEFAULT_USER_AGENT: &str = "pagesmith-brand/0.1 (+https://pagesmith.app)";

/// Brand extractor configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Total timeout for fetching the source page.
    pub timeout: Duration,
    pub user_agent: String,
    /// Upper bound on bytes read from the source page. A larger declared
    /// `Content-Length` fails the extraction; undeclared bodies are cut.
    pub max_body_bytes: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

impl ExtractorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                  |
    /// |-----------------------|--------------------------|
    /// | `SCRAPE_TIMEOUT_SECS` | `15`                     |
    /// | `SCRAPE_USER_AGENT`   | [`DEFAULT_USER_AGENT`]   |
    /// | `SCRAPE_MAX_BODY_BYTES` | `2097152`              |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timeout_secs: u64 = std::env::var("SCRAPE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("SCRAPE_TIMEOUT_SECS must be a valid u64");

        let user_agent =
            std::env::var("SCRAPE_USER_AGENT").unwrap_or_else(|_| defaults.user_agent.clone());

        let max_body_bytes: usize = std::env::var("SCRAPE_MAX_BODY_BYTES")
            .map(|v| v.parse().expect("SCRAPE_MAX_BODY_BYTES must be a valid usize"))
            .unwrap_or(defaults.max_body_bytes);

        Self {
            timeout: Duration::from_secs(timeout_secs),
            user_agent,
            max_body_bytes,
        }
    }
}
