//! AI-written initial content.
//!
//! The statically synthesized document doubles as the shape example in
//! the prompt. The completion must parse into the typed schema and pass
//! the completeness check, otherwise the call fails and the pipeline
//! records the project as errored.

use std::sync::Arc;

use pagesmith_core::project::{Language, Tone};
use pagesmith_core::sections::SectionsDocument;
use pagesmith_core::synthesis::synthesize;

use crate::client::TextGenerator;
use crate::error::AiError;
use crate::json::extract_json;
use crate::prompt::{synthesis_prompt, SYNTHESIS_SYSTEM};

/// Produces a full sections document through a [`TextGenerator`].
#[derive(Clone)]
pub struct AiSynthesizer {
    generator: Arc<dyn TextGenerator>,
}

impl AiSynthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn synthesize(
        &self,
        client_name: &str,
        tone: Tone,
        language: Language,
    ) -> Result<SectionsDocument, AiError> {
        let skeleton = synthesize(client_name, tone, language).to_value();
        let prompt = synthesis_prompt(client_name, tone, language, &skeleton.to_string());

        let completion = self.generator.generate(SYNTHESIS_SYSTEM, &prompt).await?;
        let value = extract_json(&completion)?;
        let document = SectionsDocument::from_value(value)
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;
        document.check_complete().map_err(|problems| {
            AiError::InvalidResponse(format!("incomplete document: {}", problems.join(", ")))
        })?;

        tracing::info!(client_name, %tone, %language, "AI synthesis produced a complete document");
        Ok(document)
    }
}
