//! Network-backed [`BrandExtractor`].

use async_trait::async_trait;
use url::Url;

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::parse::parse_brand;
use crate::{BrandExtractor, ExtractedBrand};

/// Fetches the source page over HTTP and parses it with [`parse_brand`].
#[derive(Debug, Clone)]
pub struct HttpBrandExtractor {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpBrandExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

/// Parse and check a source URL. Only absolute http(s) URLs are fetched.
pub fn parse_source_url(source_url: &str) -> Result<Url, ExtractError> {
    let url = Url::parse(source_url.trim())
        .map_err(|_| ExtractError::InvalidUrl(source_url.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ExtractError::InvalidUrl(source_url.to_string()));
    }
    Ok(url)
}

/// Read at most `max` bytes of the response body.
///
/// A declared `Content-Length` over the limit is rejected before any of the
/// body is read. Undeclared bodies are read chunk by chunk and the
/// connection is dropped once the limit is reached; the head of the page is
/// all the parser needs.
async fn read_capped(mut response: reqwest::Response, max: usize) -> Result<String, ExtractError> {
    if let Some(declared) = response.content_length() {
        if declared > max as u64 {
            return Err(ExtractError::BodyTooLarge { limit: max });
        }
    }

    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = max - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            tracing::debug!(limit = max, "Source body truncated at the size limit");
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(decode_body(body))
}

/// Lossy UTF-8 decode; a multi-byte char cut at the limit is dropped.
fn decode_body(mut body: Vec<u8>) -> String {
    if let Err(e) = std::str::from_utf8(&body) {
        if e.error_len().is_none() {
            body.truncate(e.valid_up_to());
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

#[async_trait]
impl BrandExtractor for HttpBrandExtractor {
    async fn extract(&self, source_url: &str) -> Result<ExtractedBrand, ExtractError> {
        let url = parse_source_url(source_url)?;
        tracing::debug!(url = %url, "Fetching source site");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::HttpStatus(status.as_u16()));
        }
        // Redirects change the base for relative asset URLs.
        let final_url = response.url().clone();
        let body = read_capped(response, self.max_body_bytes).await?;
        if body.trim().is_empty() {
            return Err(ExtractError::EmptyBody);
        }

        let brand = parse_brand(&body, &final_url);
        tracing::info!(
            url = %final_url,
            primary_color = ?brand.style.primary_color,
            fonts = brand.style.font_families.len(),
            has_logo = brand.style.logo_url.is_some(),
            language = ?brand.detected_language,
            "Extracted brand signals",
        );
        Ok(brand)
    }
}
