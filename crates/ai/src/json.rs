//! Pull a JSON value out of model output that may wrap it in prose or a
//! fenced code block.

use serde_json::Value;

use crate::error::AiError;

pub(crate) fn extract_json(text: &str) -> Result<Value, AiError> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let start = trimmed
        .find(['{', '['])
        .ok_or_else(|| AiError::InvalidResponse("no JSON in completion".into()))?;
    let closer = if trimmed[start..].starts_with('{') { '}' } else { ']' };
    let end = trimmed
        .rfind(closer)
        .filter(|&end| end > start)
        .ok_or_else(|| AiError::InvalidResponse("unterminated JSON in completion".into()))?;

    serde_json::from_str(&trimmed[start..=end])
        .map_err(|e| AiError::InvalidResponse(format!("completion is not valid JSON: {e}")))
}
