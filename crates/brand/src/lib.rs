//! Brand extraction: turn a client's website into a [`BrandStyle`].
//!
//! [`HttpBrandExtractor`] fetches the page and hands the HTML to the pure
//! [`parse_brand`] function, which pulls colors, font stacks, logo and
//! favicon URLs, the declared language and a short description out of the
//! markup and inline CSS.
//!
//! [`BrandStyle`]: pagesmith_core::project::BrandStyle

pub mod config;
pub mod error;
pub mod http;
pub mod parse;

use async_trait::async_trait;
use pagesmith_core::project::{BrandStyle, Language};

pub use config::ExtractorConfig;
pub use error::ExtractError;
pub use http::HttpBrandExtractor;
pub use parse::parse_brand;

/// Everything the pipeline learns from the source site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedBrand {
    pub style: BrandStyle,
    /// Language declared by the site's `<html lang>`, if supported.
    pub detected_language: Option<Language>,
}

/// Derives brand signals from a source URL.
#[async_trait]
pub trait BrandExtractor: Send + Sync {
    async fn extract(&self, source_url: &str) -> Result<ExtractedBrand, ExtractError>;
}
