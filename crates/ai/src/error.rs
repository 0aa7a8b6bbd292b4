use pagesmith_core::error::CoreError;

/// Failures of the generation collaborator.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("generation service not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Generation API error: {0}")]
    Api(String),

    #[error("Generation API rate limit exceeded")]
    RateLimited,

    /// The call succeeded but the output is not usable.
    #[error("Malformed generation output: {0}")]
    InvalidResponse(String),
}

impl From<AiError> for CoreError {
    fn from(err: AiError) -> Self {
        CoreError::RewriteFailed(err.to_string())
    }
}
