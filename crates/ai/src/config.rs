use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Anthropic client configuration loaded from environment variables.
///
/// `api_key` is optional: without it the generator is simply not built and
/// every rewrite fails with "generation service not configured".
#[derive(Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: u32,
}

// Keep the key out of logs.
impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &self.api_key.as_deref().map(mask_api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            max_tokens: 4096,
        }
    }
}

impl AiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                       |
    /// |----------------------|-------------------------------|
    /// | `ANTHROPIC_API_KEY`  | unset                         |
    /// | `ANTHROPIC_MODEL`    | [`DEFAULT_MODEL`]             |
    /// | `ANTHROPIC_BASE_URL` | `https://api.anthropic.com`   |
    /// | `AI_TIMEOUT_SECS`    | `60`                          |
    /// | `AI_MAX_TOKENS`      | `4096`                        |
    pub fn from_env() -> Self {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let base_url =
            std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let timeout_secs: u64 = std::env::var("AI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("AI_TIMEOUT_SECS must be a valid u64");

        let max_tokens: u32 = std::env::var("AI_MAX_TOKENS")
            .unwrap_or_else(|_| "4096".into())
            .parse()
            .expect("AI_MAX_TOKENS must be a valid u32");

        Self {
            api_key,
            base_url,
            model,
            timeout: Duration::from_secs(timeout_secs),
            max_tokens,
        }
    }
}

/// Show only the last four characters of a key.
pub fn mask_api_key(key: &str) -> String {
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if key.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("****{tail}")
    }
}
