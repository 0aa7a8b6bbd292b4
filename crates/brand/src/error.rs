use pagesmith_core::error::CoreError;

/// Failures of the brand extraction collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Invalid source URL '{0}'")]
    InvalidUrl(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Source site returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Source page is larger than {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("Source site returned an empty page")]
    EmptyBody,
}

impl From<ExtractError> for CoreError {
    fn from(err: ExtractError) -> Self {
        CoreError::ExtractionFailed(err.to_string())
    }
}
