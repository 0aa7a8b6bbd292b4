//! Dotted field-path addressing into a sections document.
//!
//! A path such as `steps.2.title` is resolved against one section by
//! explicit recursive descent over the section's JSON form. Writes create
//! missing intermediate objects, never touch siblings, and the patched
//! section is re-parsed into its typed schema before the new document is
//! returned, so a write can never leave the document in an unknown shape.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::sections::{SectionKey, SectionsDocument};

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Split a path into segments, rejecting empty ones.
fn segments(field_path: &str) -> Result<Vec<&str>, CoreError> {
    if field_path.is_empty() {
        return Err(CoreError::invalid_path(field_path, "path is empty"));
    }
    let parts: Vec<&str> = field_path.split(SEPARATOR).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(CoreError::invalid_path(field_path, "path has an empty segment"));
    }
    Ok(parts)
}

/// Split a full path like `hero.headline` into its section and the
/// remaining field path.
pub fn split_section(full_path: &str) -> Result<(SectionKey, &str), CoreError> {
    let (head, rest) = full_path
        .split_once(SEPARATOR)
        .ok_or_else(|| CoreError::invalid_path(full_path, "path must name a field inside a section"))?;
    let key = head
        .parse::<SectionKey>()
        .map_err(|_| CoreError::invalid_path(full_path, format!("unknown section '{head}'")))?;
    Ok((key, rest))
}

/// Return a copy of `document` with the leaf at `section.field_path` set to
/// `value`.
pub fn apply_field_path(
    document: &SectionsDocument,
    section: SectionKey,
    field_path: &str,
    value: Value,
) -> Result<SectionsDocument, CoreError> {
    let full = format!("{section}{SEPARATOR}{field_path}");
    let parts = segments(field_path).map_err(|_| CoreError::invalid_path(&full, "malformed path"))?;

    let mut node = document
        .section_value(section)
        .unwrap_or_else(|| Value::Object(Map::new()));
    set_in(&mut node, &parts, value, &full)?;

    let mut patched = document.clone();
    patched.set_section_value(section, node, &full)?;
    Ok(patched)
}

/// [`apply_field_path`] addressed by a full `section.field` path.
pub fn apply_full_path(
    document: &SectionsDocument,
    full_path: &str,
    value: Value,
) -> Result<SectionsDocument, CoreError> {
    let (section, rest) = split_section(full_path)?;
    apply_field_path(document, section, rest, value)
}

/// Read the value at `section.field_path`.
pub fn read_field_path(
    document: &SectionsDocument,
    section: SectionKey,
    field_path: &str,
) -> Result<Value, CoreError> {
    let full = format!("{section}{SEPARATOR}{field_path}");
    let parts = segments(field_path).map_err(|_| CoreError::invalid_path(&full, "malformed path"))?;
    let root = document
        .section_value(section)
        .ok_or_else(|| CoreError::invalid_path(&full, "section is absent"))?;

    let mut node = &root;
    for part in parts {
        node = match node {
            Value::Object(map) => map
                .get(part)
                .ok_or_else(|| CoreError::invalid_path(&full, format!("no field '{part}'")))?,
            Value::Array(items) => {
                let idx = index(part, items.len(), &full)?;
                &items[idx]
            }
            _ => {
                return Err(CoreError::invalid_path(
                    &full,
                    format!("cannot descend into a scalar at '{part}'"),
                ))
            }
        };
    }
    Ok(node.clone())
}

/// [`read_field_path`] addressed by a full `section.field` path.
pub fn read_full_path(document: &SectionsDocument, full_path: &str) -> Result<Value, CoreError> {
    let (section, rest) = split_section(full_path)?;
    read_field_path(document, section, rest)
}

fn index(segment: &str, len: usize, full: &str) -> Result<usize, CoreError> {
    let idx: usize = segment.parse().map_err(|_| {
        CoreError::invalid_path(full, format!("'{segment}' is not a list index"))
    })?;
    if idx >= len {
        return Err(CoreError::invalid_path(
            full,
            format!("index {idx} is out of bounds for a list of {len}"),
        ));
    }
    Ok(idx)
}

fn set_in(node: &mut Value, parts: &[&str], value: Value, full: &str) -> Result<(), CoreError> {
    let Some((head, rest)) = parts.split_first() else {
        *node = value;
        return Ok(());
    };

    match node {
        Value::Object(map) => {
            if rest.is_empty() {
                map.insert((*head).to_string(), value);
                return Ok(());
            }
            let child = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if child.is_null() {
                *child = Value::Object(Map::new());
            }
            set_in(child, rest, value, full)
        }
        Value::Array(items) => {
            let idx = index(head, items.len(), full)?;
            set_in(&mut items[idx], rest, value, full)
        }
        _ => Err(CoreError::invalid_path(
            full,
            format!("cannot descend into a scalar at '{head}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::project::{Language, Tone};
    use crate::synthesis::synthesize;

    fn doc() -> SectionsDocument {
        synthesize("Acme Bank", Tone::Neutral, Language::En)
    }

    #[test]
    fn write_then_read_returns_value() {
        let d = doc();
        let patched =
            apply_field_path(&d, SectionKey::HowItWorks, "steps.1.title", json!("New title"))
                .unwrap();
        assert_eq!(
            read_field_path(&patched, SectionKey::HowItWorks, "steps.1.title").unwrap(),
            json!("New title")
        );
    }

    #[test]
    fn write_leaves_siblings_untouched() {
        let d = doc();
        let before_body = read_full_path(&d, "howItWorks.steps.1.body").unwrap();
        let before_other = read_full_path(&d, "howItWorks.steps.0.title").unwrap();
        let before_hero = read_full_path(&d, "hero.headline").unwrap();

        let patched = apply_full_path(&d, "howItWorks.steps.1.title", json!("X")).unwrap();

        assert_eq!(read_full_path(&patched, "howItWorks.steps.1.body").unwrap(), before_body);
        assert_eq!(read_full_path(&patched, "howItWorks.steps.0.title").unwrap(), before_other);
        assert_eq!(read_full_path(&patched, "hero.headline").unwrap(), before_hero);
        // The input document is not mutated.
        assert_ne!(read_full_path(&d, "howItWorks.steps.1.title").unwrap(), json!("X"));
    }

    #[test]
    fn creates_intermediate_containers() {
        let d = doc();
        let patched = apply_full_path(
            &d,
            "compare.microcopyByCompetitor.newcomer.tooltip",
            json!("Fees checked weekly"),
        )
        .unwrap();
        let compare = patched.compare.unwrap();
        assert_eq!(
            compare.microcopy_by_competitor["newcomer"].tooltip,
            "Fees checked weekly"
        );
        assert!(compare.microcopy_by_competitor["newcomer"].sources.is_empty());
    }

    #[test]
    fn out_of_bounds_index_is_invalid_path() {
        let d = doc();
        let len = d.how_it_works.as_ref().unwrap().steps.len();
        let err = apply_field_path(
            &d,
            SectionKey::HowItWorks,
            &format!("steps.{len}.title"),
            json!("x"),
        )
        .unwrap_err();
        assert_matches!(err, CoreError::InvalidPath { .. });
    }

    #[test]
    fn non_numeric_index_is_invalid_path() {
        let err = apply_full_path(&doc(), "howItWorks.steps.first.title", json!("x")).unwrap_err();
        assert_matches!(err, CoreError::InvalidPath { .. });
    }

    #[test]
    fn unknown_field_rejected_by_schema() {
        let err = apply_full_path(&doc(), "hero.tagline", json!("x")).unwrap_err();
        assert_matches!(err, CoreError::InvalidPath { .. });
    }

    #[test]
    fn wrong_type_rejected_by_schema() {
        let err = apply_full_path(&doc(), "hero.countries", json!("Mexico")).unwrap_err();
        assert_matches!(err, CoreError::InvalidPath { .. });
    }

    #[test]
    fn descending_into_scalar_rejected() {
        let err = apply_full_path(&doc(), "hero.headline.text", json!("x")).unwrap_err();
        assert_matches!(err, CoreError::InvalidPath { .. });
    }

    #[test]
    fn malformed_paths_rejected() {
        assert_matches!(
            apply_full_path(&doc(), "hero..headline", json!("x")),
            Err(CoreError::InvalidPath { .. })
        );
        assert_matches!(
            apply_full_path(&doc(), "hero", json!("x")),
            Err(CoreError::InvalidPath { .. })
        );
        assert_matches!(
            apply_full_path(&doc(), "sidebar.title", json!("x")),
            Err(CoreError::InvalidPath { .. })
        );
    }

    #[test]
    fn writing_into_absent_section_must_still_fit_schema() {
        let empty = SectionsDocument::default();
        let err = apply_field_path(&empty, SectionKey::Pricing, "headline", json!("x")).unwrap_err();
        assert_matches!(err, CoreError::InvalidPath { .. });
    }

    #[test]
    fn optional_nested_field_can_be_added() {
        let patched =
            apply_full_path(&doc(), "hero.visual.overlayMockUrl", json!("https://cdn/x.png"))
                .unwrap();
        assert_eq!(
            patched.hero.unwrap().visual.overlay_mock_url.as_deref(),
            Some("https://cdn/x.png")
        );
    }
}
