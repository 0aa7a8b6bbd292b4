//! Generative-AI collaborator: the Anthropic client, the rewrite engine
//! and AI-backed content synthesis.

pub mod client;
pub mod config;
pub mod error;
mod json;
pub mod prompt;
pub mod rewrite;
pub mod synthesize;

pub use client::{AnthropicClient, TextGenerator};
pub use config::AiConfig;
pub use error::AiError;
pub use rewrite::{RewriteEngine, RewriteField, RewriteRequest, RewriteResult};
pub use synthesize::AiSynthesizer;
