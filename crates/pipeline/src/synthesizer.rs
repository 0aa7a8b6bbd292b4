//! The content synthesis seam.

use std::sync::Arc;

use async_trait::async_trait;
use pagesmith_ai::{AiSynthesizer, TextGenerator};
use pagesmith_core::project::{Language, Tone};
use pagesmith_core::sections::SectionsDocument;
use pagesmith_core::synthesis::synthesize;

use crate::config::SynthesisMode;
use crate::error::SynthesisError;

/// Produces the initial sections document for a project.
#[async_trait]
pub trait ContentSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        client_name: &str,
        tone: Tone,
        language: Language,
    ) -> Result<SectionsDocument, SynthesisError>;
}

/// Phrasebook-based synthesis. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSynthesizer;

#[async_trait]
impl ContentSynthesizer for StaticSynthesizer {
    async fn synthesize(
        &self,
        client_name: &str,
        tone: Tone,
        language: Language,
    ) -> Result<SectionsDocument, SynthesisError> {
        Ok(synthesize(client_name, tone, language))
    }
}

#[async_trait]
impl ContentSynthesizer for AiSynthesizer {
    async fn synthesize(
        &self,
        client_name: &str,
        tone: Tone,
        language: Language,
    ) -> Result<SectionsDocument, SynthesisError> {
        AiSynthesizer::synthesize(self, client_name, tone, language)
            .await
            .map_err(|e| SynthesisError(e.to_string()))
    }
}

/// Pick the synthesizer for `mode`.
///
/// `ai` without a configured generator falls back to static copy so a
/// missing API key never blocks project creation.
pub fn synthesizer_for(
    mode: SynthesisMode,
    generator: Option<Arc<dyn TextGenerator>>,
) -> Arc<dyn ContentSynthesizer> {
    match (mode, generator) {
        (SynthesisMode::Ai, Some(generator)) => Arc::new(AiSynthesizer::new(generator)),
        (SynthesisMode::Ai, None) => {
            tracing::warn!("SYNTHESIS_MODE=ai but no generation service is configured, using static copy");
            Arc::new(StaticSynthesizer)
        }
        (SynthesisMode::Static, _) => Arc::new(StaticSynthesizer),
    }
}

#[cfg(test)]
mod tests {
    use pagesmith_ai::AiError;

    use super::*;

    struct Unreachable;

    #[async_trait]
    impl TextGenerator for Unreachable {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, AiError> {
            Err(AiError::Network("offline".into()))
        }
    }

    #[tokio::test]
    async fn static_mode_ignores_generator() {
        let synth = synthesizer_for(SynthesisMode::Static, Some(Arc::new(Unreachable)));
        let doc = synth.synthesize("Acme Bank", Tone::Neutral, Language::En).await.unwrap();
        assert!(doc.check_complete().is_ok());
    }

    #[tokio::test]
    async fn ai_mode_without_generator_falls_back() {
        let synth = synthesizer_for(SynthesisMode::Ai, None);
        assert!(synth.synthesize("Acme Bank", Tone::Neutral, Language::Es).await.is_ok());
    }

    #[tokio::test]
    async fn ai_mode_surfaces_generator_failures() {
        let synth = synthesizer_for(SynthesisMode::Ai, Some(Arc::new(Unreachable)));
        let err = synth.synthesize("Acme Bank", Tone::Neutral, Language::En).await.unwrap_err();
        assert!(err.to_string().contains("offline"));
    }
}
