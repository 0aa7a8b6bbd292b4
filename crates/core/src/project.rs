//! Project, BrandStyle and Page entities plus the project status machine.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::sections::SectionsDocument;
use crate::types::{DbId, Timestamp};

/// Template key meaning "let the selector decide".
pub const TEMPLATE_AUTO: &str = "auto";

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Wire / storage representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(CoreError::invalid(format!(
                        "Invalid {} '{other}'. Must be one of: {}",
                        $label,
                        [$( $text ),+].join(", ")
                    ))),
                }
            }
        }
    };
}

string_enum! {
    /// Voice register used for generated and rewritten copy.
    #[derive(Default)]
    Tone ("tone") {
        Corporate = "corporate",
        #[default]
        Neutral = "neutral",
        Friendly = "friendly",
    }
}

string_enum! {
    /// Locale requested at project creation. `Auto` defers to the site.
    #[derive(Default)]
    Locale ("locale") {
        #[default]
        Auto = "auto",
        En = "en",
        Es = "es",
        Pt = "pt",
    }
}

string_enum! {
    /// A concrete content language.
    Language ("language") {
        En = "en",
        Es = "es",
        Pt = "pt",
    }
}

string_enum! {
    /// Project lifecycle status.
    ///
    /// Valid transitions are `pending -> ready` and `pending -> error` only.
    ProjectStatus ("status") {
        Pending = "pending",
        Ready = "ready",
        Error = "error",
    }
}

impl Locale {
    /// Resolve to a concrete language.
    ///
    /// An explicit locale wins; `Auto` uses the language detected on the
    /// source site, falling back to `default`.
    pub fn resolve(self, detected: Option<Language>, default: Language) -> Language {
        match self {
            Locale::En => Language::En,
            Locale::Es => Language::Es,
            Locale::Pt => Language::Pt,
            Locale::Auto => detected.unwrap_or(default),
        }
    }
}

impl Language {
    /// Map an HTML `lang` attribute such as `es-MX` to a supported language.
    pub fn from_lang_tag(tag: &str) -> Option<Language> {
        let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        primary.parse().ok()
    }
}

impl ProjectStatus {
    /// `ready` and `error` are terminal.
    pub fn is_terminal(self) -> bool {
        !matches!(self, ProjectStatus::Pending)
    }

    pub fn can_transition_to(self, next: ProjectStatus) -> bool {
        matches!(
            (self, next),
            (ProjectStatus::Pending, ProjectStatus::Ready)
                | (ProjectStatus::Pending, ProjectStatus::Error)
        )
    }

    /// Validate a transition, returning the new status.
    pub fn transition(self, next: ProjectStatus) -> Result<ProjectStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// One landing-page generation request and its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub slug: String,
    pub client_name: String,
    pub source_url: String,
    pub template_key: String,
    pub tone: Tone,
    pub locale: Locale,
    pub status: ProjectStatus,
    /// Reason recorded when the pipeline moved the project to `error`.
    pub error_message: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Brand style descriptor derived from the source site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandStyle {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    #[serde(default)]
    pub font_families: Vec<String>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub style_notes: Option<String>,
}

/// The section document of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub project_id: DbId,
    pub sections: SectionsDocument,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project with its owned brand style and page, as returned by `Get project`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub brand_style: Option<BrandStyle>,
    pub page: Option<Page>,
}

/// Insert DTO for a project. Status always starts at `pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub slug: String,
    pub client_name: String,
    pub source_url: String,
    pub template_key: String,
    pub tone: Tone,
    pub locale: Locale,
    pub expires_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Create request
// ---------------------------------------------------------------------------

fn default_template_key() -> String {
    TEMPLATE_AUTO.to_string()
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be empty".into()));
    }
    Ok(())
}

/// Body of `POST /projects`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    #[validate(url(message = "must be a well-formed URL"))]
    pub source_url: String,
    #[validate(custom(function = "not_blank"))]
    pub client_name: String,
    #[serde(default = "default_template_key")]
    pub template_key: String,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub locale: Locale,
}

impl CreateProjectInput {
    /// Run field validation, mapping failures to `InvalidRequest` with
    /// camelCase field names.
    pub fn check(&self) -> Result<(), CoreError> {
        let mut errors = match self.validate() {
            Ok(()) => BTreeMap::new(),
            Err(e) => field_messages(&e),
        };
        if self.template_key.trim().is_empty() {
            errors
                .entry("templateKey".to_string())
                .or_default()
                .push("must not be empty".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidRequest {
                message: "Invalid request data".to_string(),
                fields: errors,
            })
        }
    }
}

fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (snake_to_camel(&field), messages)
        })
        .collect()
}

fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn input(url: &str, name: &str) -> CreateProjectInput {
        CreateProjectInput {
            source_url: url.to_string(),
            client_name: name.to_string(),
            template_key: TEMPLATE_AUTO.to_string(),
            tone: Tone::Neutral,
            locale: Locale::Auto,
        }
    }

    #[test]
    fn status_transitions_only_leave_pending() {
        use ProjectStatus::*;
        assert!(Pending.can_transition_to(Ready));
        assert!(Pending.can_transition_to(Error));
        for from in [Ready, Error] {
            for to in ProjectStatus::ALL {
                assert!(!from.can_transition_to(*to), "{from} -> {to}");
            }
        }
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn transition_rejects_terminal_revert() {
        assert_matches!(
            ProjectStatus::Ready.transition(ProjectStatus::Pending),
            Err(CoreError::InvalidTransition { .. })
        );
        assert_eq!(
            ProjectStatus::Pending.transition(ProjectStatus::Error).unwrap(),
            ProjectStatus::Error
        );
    }

    #[test]
    fn locale_resolution() {
        assert_eq!(Locale::Es.resolve(Some(Language::Pt), Language::En), Language::Es);
        assert_eq!(Locale::Auto.resolve(Some(Language::Pt), Language::En), Language::Pt);
        assert_eq!(Locale::Auto.resolve(None, Language::En), Language::En);
    }

    #[test]
    fn lang_tags() {
        assert_eq!(Language::from_lang_tag("es-MX"), Some(Language::Es));
        assert_eq!(Language::from_lang_tag("PT_br"), Some(Language::Pt));
        assert_eq!(Language::from_lang_tag("fr"), None);
        assert_eq!(Language::from_lang_tag(""), None);
    }

    #[test]
    fn enum_parsing() {
        assert_eq!("friendly".parse::<Tone>().unwrap(), Tone::Friendly);
        assert_matches!("loud".parse::<Tone>(), Err(CoreError::InvalidRequest { .. }));
    }

    #[test]
    fn create_input_defaults() {
        let parsed: CreateProjectInput = serde_json::from_value(serde_json::json!({
            "sourceUrl": "https://example-bank.com",
            "clientName": "Acme Bank"
        }))
        .unwrap();
        assert_eq!(parsed.template_key, "auto");
        assert_eq!(parsed.tone, Tone::Neutral);
        assert_eq!(parsed.locale, Locale::Auto);
        assert!(parsed.check().is_ok());
        assert_eq!(Tone::default(), Tone::Neutral);
        assert_eq!(Locale::default(), Locale::Auto);
    }

    #[test]
    fn create_input_reports_fields() {
        let err = input("not a url", "  ").check().unwrap_err();
        let CoreError::InvalidRequest { fields, .. } = err else {
            panic!("expected InvalidRequest");
        };
        assert!(fields.contains_key("sourceUrl"));
        assert!(fields.contains_key("clientName"));
    }
}
