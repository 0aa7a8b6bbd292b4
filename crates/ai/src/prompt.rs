//! Prompt text for rewrite and synthesis calls.

use pagesmith_core::project::{Language, Tone};

pub fn tone_guidance(tone: Tone) -> &'static str {
    match tone {
        Tone::Corporate => "formal, precise and reassuring, as a regulated institution would write",
        Tone::Neutral => "clear, direct and plain-spoken",
        Tone::Friendly => "warm, conversational and upbeat, addressing the reader as a friend",
    }
}

pub fn language_name(language: Language) -> &'static str {
    match language {
        Language::En => "English",
        Language::Es => "Latin American Spanish",
        Language::Pt => "Brazilian Portuguese",
    }
}

pub const REWRITE_SYSTEM: &str = "You rewrite marketing copy for an international money \
transfer landing page. You answer with a single JSON object and nothing else.";

pub const SYNTHESIS_SYSTEM: &str = "You write marketing copy for international money \
transfer landing pages. You answer with a single JSON object and nothing else.";

/// Build the user prompt for a rewrite batch. `fields_json` is the input
/// array of `{path, text}` objects.
pub fn rewrite_prompt(
    fields_json: &str,
    tone: Tone,
    language: Language,
    client_name: &str,
    style_hints: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Rewrite each field below for the brand \"{client_name}\".\n\
         Tone: {tone_text}.\n\
         Write in {lang}.\n",
        tone_text = tone_guidance(tone),
        lang = language_name(language),
    );
    if let Some(hints) = style_hints.map(str::trim).filter(|h| !h.is_empty()) {
        prompt.push_str(&format!("Brand style notes: {hints}\n"));
    }
    prompt.push_str(
        "\nRules:\n\
         - Return exactly one entry per input field, with the same \"path\", in the same order.\n\
         - Keep every token in curly braces such as {Country} or {Bank} exactly as written, \
         or replace {Bank}-style brand tokens with the brand name.\n\
         - Keep the purpose of each field: button and link texts stay short and imperative, \
         headlines stay headline length.\n\
         - Do not invent fees, rates, licenses or guarantees.\n\n\
         Respond as {\"rewrites\": [{\"path\": \"...\", \"text\": \"...\"}]}.\n\n\
         Fields:\n",
    );
    prompt.push_str(fields_json);
    prompt
}

/// Build the user prompt for full-document synthesis. `skeleton_json` is a
/// complete example document the output must mirror key for key.
pub fn synthesis_prompt(
    client_name: &str,
    tone: Tone,
    language: Language,
    skeleton_json: &str,
) -> String {
    format!(
        "Write the landing page content for \"{client_name}\".\n\
         Tone: {tone_text}.\n\
         Write all copy in {lang}.\n\n\
         Return a JSON object with exactly the same keys and nesting as the example below. \
         Every string must be non-empty and every list must keep at least one item. \
         Keep the tokens {{Country}} and {{Bank}} where they appear. \
         Keep all URLs and hrefs unchanged.\n\n\
         Example:\n{skeleton_json}",
        tone_text = tone_guidance(tone),
        lang = language_name(language),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_prompt_mentions_directives() {
        let p = rewrite_prompt("[]", Tone::Friendly, Language::Es, "Acme Bank", Some("Bold blues"));
        assert!(p.contains("Acme Bank"));
        assert!(p.contains("Latin American Spanish"));
        assert!(p.contains("warm"));
        assert!(p.contains("Bold blues"));
    }

    #[test]
    fn blank_style_hints_are_omitted() {
        let p = rewrite_prompt("[]", Tone::Neutral, Language::En, "Acme", Some("  "));
        assert!(!p.contains("style notes"));
    }

    #[test]
    fn synthesis_prompt_keeps_placeholder_braces() {
        let p = synthesis_prompt("Acme", Tone::Neutral, Language::Pt, "{}");
        assert!(p.contains("{Country}"));
        assert!(p.contains("{Bank}"));
    }
}
