//! Text generation over the Anthropic Messages API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::error::AiError;

/// Anthropic API version header value.
const API_VERSION: &str = "2023-06-01";

/// Longest upstream error text passed through after sanitizing.
const MAX_ERROR_LEN: usize = 300;

/// A single-turn text generator: system instructions in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, AiError>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    r#type: String,
    message: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Anthropic Messages API client.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Build a client from configuration. Returns `Ok(None)` when no API key
    /// is configured.
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>, AiError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Network(e.to_string()))?;
        Ok(Some(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }))
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, AiError> {
        let url = format!("{}/v1/messages", self.base_url);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %self.model, "Sending generation request");
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(AiError::RateLimited);
            }
            let detail = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(err) => format!("{}: {}", err.error.r#type, err.error.message),
                Err(_) => format!("HTTP {status}"),
            };
            return Err(AiError::Api(sanitize_api_error(&detail)));
        }

        let parsed: MessagesResponse =
            serde_json::from_str(&body).map_err(|e| AiError::InvalidResponse(e.to_string()))?;
        if parsed.stop_reason.as_deref() == Some("max_tokens") {
            tracing::warn!("Generation stopped at max_tokens; output may be truncated");
        }

        let text: String = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect();
        if text.trim().is_empty() {
            return Err(AiError::InvalidResponse("empty completion".into()));
        }
        Ok(text)
    }
}

/// Strip credentials and internals from upstream error text.
fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();
    if ["api key", "x-api-key", "unauthorized", "authentication", "permission"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        return "authentication error; check the API key configuration".to_string();
    }
    if lower.contains("overloaded") || lower.contains("rate limit") {
        return "service overloaded; try again later".to_string();
    }
    if error.chars().count() > MAX_ERROR_LEN {
        let cut: String = error.chars().take(MAX_ERROR_LEN).collect();
        format!("{cut}...(truncated)")
    } else {
        error.to_string()
    }
}
