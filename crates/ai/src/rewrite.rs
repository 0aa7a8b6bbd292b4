//! Field-level AI rewrites.
//!
//! A batch is all-or-nothing at the transport boundary: a failed call or
//! an unparseable completion fails the whole request. Inside a parsed
//! completion each field is checked on its own; a missing entry, an empty
//! text or a dropped placeholder keeps the original text and adds a
//! warning. The output always has one entry per input field, in input
//! order.

use std::sync::{Arc, LazyLock};

use pagesmith_core::project::{Language, Tone};
use pagesmith_core::synthesis::PLACEHOLDER_BANK;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::TextGenerator;
use crate::error::AiError;
use crate::json::extract_json;
use crate::prompt::{rewrite_prompt, REWRITE_SYSTEM};

/// Regex pattern matching `{Placeholder}` tokens in copy.
pub const PLACEHOLDER_PATTERN: &str = r"\{[A-Za-z][A-Za-z0-9_]*\}";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid regex"));

/// One addressed piece of text, in or out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteField {
    pub path: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewriteRequest {
    pub fields: Vec<RewriteField>,
    pub tone: Tone,
    pub language: Language,
    pub style_hints: Option<String>,
    pub client_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RewriteResult {
    pub rewrites: Vec<RewriteField>,
    pub warnings: Vec<String>,
}

/// Rewrites batches of fields through a [`TextGenerator`].
#[derive(Clone)]
pub struct RewriteEngine {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl RewriteEngine {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn rewrite(&self, request: &RewriteRequest) -> Result<RewriteResult, AiError> {
        if request.fields.is_empty() {
            return Ok(RewriteResult::default());
        }
        let generator = self.generator.as_ref().ok_or(AiError::NotConfigured)?;

        let fields_json = Value::Array(
            request
                .fields
                .iter()
                .map(|f| json!({ "path": f.path, "text": f.text }))
                .collect(),
        )
        .to_string();
        let prompt = rewrite_prompt(
            &fields_json,
            request.tone,
            request.language,
            &request.client_name,
            request.style_hints.as_deref(),
        );

        let completion = generator.generate(REWRITE_SYSTEM, &prompt).await?;
        let outputs = parse_rewrites(&completion)?;
        let result = reconcile(request, outputs);

        tracing::info!(
            fields = request.fields.len(),
            warnings = result.warnings.len(),
            language = %request.language,
            tone = %request.tone,
            "Rewrite completed",
        );
        Ok(result)
    }
}

/// Parse `{"rewrites": [...]}` or a bare array. Entries without a string
/// `path` and `text` are skipped so the field they were meant for is
/// reported as missing.
fn parse_rewrites(completion: &str) -> Result<Vec<RewriteField>, AiError> {
    let value = extract_json(completion)?;
    let entries = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("rewrites") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AiError::InvalidResponse(
                    "completion has no \"rewrites\" array".into(),
                ))
            }
        },
        _ => return Err(AiError::InvalidResponse("completion is not an object".into())),
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RewriteField>(entry).ok())
        .collect())
}

fn placeholders(text: &str) -> Vec<&str> {
    PLACEHOLDER_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Placeholder tokens that stand for the client's own brand. The model may
/// replace these with the client name instead of keeping them.
pub const BRAND_PLACEHOLDERS: &[&str] = &[PLACEHOLDER_BANK];

/// Placeholders present in `original` but missing from `rewritten`.
///
/// Each token is judged on its own. A missing brand token counts as
/// substituted only while the rewrite has unclaimed new occurrences of the
/// client name, one per missing token. Every other token must survive
/// verbatim.
fn dropped_placeholders<'a>(original: &'a str, rewritten: &str, client_name: &str) -> Vec<&'a str> {
    let name = client_name.trim().to_lowercase();
    let mut added_names = if name.is_empty() {
        0
    } else {
        let added = rewritten.to_lowercase().matches(name.as_str()).count();
        let existing = original.to_lowercase().matches(name.as_str()).count();
        added.saturating_sub(existing)
    };

    let mut seen = Vec::new();
    let mut dropped = Vec::new();
    for token in placeholders(original) {
        if seen.contains(&token) {
            continue;
        }
        seen.push(token);
        let missing = original
            .matches(token)
            .count()
            .saturating_sub(rewritten.matches(token).count());
        if missing == 0 {
            continue;
        }
        if BRAND_PLACEHOLDERS.contains(&token) && added_names >= missing {
            added_names -= missing;
            continue;
        }
        dropped.push(token);
    }
    dropped
}

fn reconcile(request: &RewriteRequest, outputs: Vec<RewriteField>) -> RewriteResult {
    let mut used = vec![false; outputs.len()];
    let mut result = RewriteResult::default();

    for field in &request.fields {
        let found = outputs
            .iter()
            .enumerate()
            .find(|(i, out)| !used[*i] && out.path == field.path)
            .map(|(i, out)| {
                used[i] = true;
                out.text.trim().to_string()
            });

        let text = match found {
            None => {
                result
                    .warnings
                    .push(format!("No rewrite returned for '{}'; original text kept", field.path));
                field.text.clone()
            }
            Some(text) if text.is_empty() => {
                result
                    .warnings
                    .push(format!("Empty rewrite for '{}'; original text kept", field.path));
                field.text.clone()
            }
            Some(text) => {
                let dropped = dropped_placeholders(&field.text, &text, &request.client_name);
                if dropped.is_empty() {
                    text
                } else {
                    result.warnings.push(format!(
                        "Rewrite for '{}' dropped {}; original text kept",
                        field.path,
                        dropped.join(", ")
                    ));
                    field.text.clone()
                }
            }
        };
        result.rewrites.push(RewriteField {
            path: field.path.clone(),
            text,
        });
    }

    for (out, _) in outputs.iter().zip(&used).filter(|(_, used)| !**used) {
        result
            .warnings
            .push(format!("Ignored rewrite for unrequested path '{}'", out.path));
    }
    result
}
