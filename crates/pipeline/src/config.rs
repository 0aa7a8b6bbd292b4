use std::fmt;
use std::str::FromStr;

use pagesmith_core::error::CoreError;
use pagesmith_core::project::Language;
use pagesmith_core::types::Timestamp;
use pagesmith_core::visibility::demo_expiry;

/// Where initial page content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynthesisMode {
    /// Deterministic phrasebook copy.
    #[default]
    Static,
    /// Copy written by the generation service.
    Ai,
}

impl FromStr for SynthesisMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "ai" => Ok(Self::Ai),
            other => Err(CoreError::invalid(format!(
                "Invalid synthesis mode '{other}'. Must be one of: static, ai"
            ))),
        }
    }
}

impl fmt::Display for SynthesisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Static => "static",
            Self::Ai => "ai",
        })
    }
}

/// Pipeline feature flags, fixed at construction time.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Demo projects expire `demo_ttl_hours` after creation.
    pub demo_mode: bool,
    pub demo_ttl_hours: i64,
    /// Language used when the locale is `auto` and the site declares none.
    pub default_language: Language,
    pub synthesis_mode: SynthesisMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            demo_mode: false,
            demo_ttl_hours: 48,
            default_language: Language::En,
            synthesis_mode: SynthesisMode::Static,
        }
    }
}

/// Longest accepted demo lifetime: ten years.
pub const MAX_DEMO_TTL_HOURS: i64 = 24 * 365 * 10;

/// Parse `DEMO_TTL_HOURS`: a whole number of hours in
/// `1..=MAX_DEMO_TTL_HOURS`.
pub fn parse_demo_ttl(value: &str) -> Result<i64, CoreError> {
    let hours: i64 = value
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid(format!("Invalid demo TTL '{value}'")))?;
    if !(1..=MAX_DEMO_TTL_HOURS).contains(&hours) {
        return Err(CoreError::invalid(format!(
            "Demo TTL must be between 1 and {MAX_DEMO_TTL_HOURS} hours, got {hours}"
        )));
    }
    Ok(hours)
}

/// `true` for `1`, `true`, `yes` or `on` (any case).
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

impl PipelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var            | Default  |
    /// |--------------------|----------|
    /// | `DEMO_MODE`        | `false`  |
    /// | `DEMO_TTL_HOURS`   | `48` (at most [`MAX_DEMO_TTL_HOURS`]) |
    /// | `DEFAULT_LANGUAGE` | `en`     |
    /// | `SYNTHESIS_MODE`   | `static` |
    pub fn from_env() -> Self {
        let demo_mode = env_flag("DEMO_MODE");

        let demo_ttl_hours = parse_demo_ttl(
            &std::env::var("DEMO_TTL_HOURS").unwrap_or_else(|_| "48".into()),
        )
        .expect("DEMO_TTL_HOURS must be a whole number of hours within range");

        let default_language: Language = std::env::var("DEFAULT_LANGUAGE")
            .unwrap_or_else(|_| "en".into())
            .parse()
            .expect("DEFAULT_LANGUAGE must be one of: en, es, pt");

        let synthesis_mode: SynthesisMode = std::env::var("SYNTHESIS_MODE")
            .unwrap_or_else(|_| "static".into())
            .parse()
            .expect("SYNTHESIS_MODE must be one of: static, ai");

        Self {
            demo_mode,
            demo_ttl_hours,
            default_language,
            synthesis_mode,
        }
    }

    /// Expiry for a project created at `now`: set only in demo mode.
    pub fn expiry_for(&self, now: Timestamp) -> Option<Timestamp> {
        self.demo_mode.then(|| demo_expiry(now, self.demo_ttl_hours))
    }
}
