//! Section document schema.
//!
//! A page is a fixed set of nine section kinds. Each kind is a typed struct
//! so that every write (full replace or field-path patch) is checked against
//! the declared shape: unknown keys and wrongly typed values are rejected at
//! deserialization time, and [`SectionsDocument::check_complete`] enforces the
//! non-empty requirements the synthesizer must meet.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Section keys
// ---------------------------------------------------------------------------

/// The fixed set of section kinds, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    Hero,
    HowItWorks,
    Pricing,
    Why,
    Stories,
    Compliance,
    Compare,
    FinalCta,
    Footer,
}

impl SectionKey {
    pub const ALL: [SectionKey; 9] = [
        SectionKey::Hero,
        SectionKey::HowItWorks,
        SectionKey::Pricing,
        SectionKey::Why,
        SectionKey::Stories,
        SectionKey::Compliance,
        SectionKey::Compare,
        SectionKey::FinalCta,
        SectionKey::Footer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Hero => "hero",
            SectionKey::HowItWorks => "howItWorks",
            SectionKey::Pricing => "pricing",
            SectionKey::Why => "why",
            SectionKey::Stories => "stories",
            SectionKey::Compliance => "compliance",
            SectionKey::Compare => "compare",
            SectionKey::FinalCta => "finalCta",
            SectionKey::Footer => "footer",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::invalid_path(s, "unknown section"))
    }
}

// ---------------------------------------------------------------------------
// Item types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TitledText {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Badge {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Testimonial {
    pub quote: String,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeroVisual {
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_mock_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompetitorMicrocopy {
    pub tooltip: String,
    #[serde(default)]
    pub sources: Vec<Link>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeroSection {
    pub headline: String,
    /// May contain the `{Country}` placeholder, filled at render time.
    pub subheadline: String,
    pub countries: Vec<String>,
    pub primary_cta_text: String,
    pub primary_cta_href: String,
    pub visual: HeroVisual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HowItWorksSection {
    pub headline: String,
    pub steps: Vec<TitledText>,
    pub copy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PricingSection {
    pub headline: String,
    pub copy: String,
    pub cta_text: String,
    pub cta_href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WhySection {
    pub headline: String,
    pub bullets: Vec<TitledText>,
    #[serde(default)]
    pub trust_badges: Vec<Badge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StoriesSection {
    pub headline: String,
    pub testimonials: Vec<Testimonial>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComplianceSection {
    pub headline: String,
    pub copy: String,
    #[serde(default)]
    pub badges: Vec<Badge>,
    pub link_text: String,
    pub link_href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompareSection {
    /// May contain the `{Bank}` placeholder, filled at render time.
    pub subcopy: String,
    pub disclaimer: String,
    #[serde(default)]
    pub microcopy_by_competitor: BTreeMap<String, CompetitorMicrocopy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FinalCtaSection {
    pub headline: String,
    pub cta_text: String,
    pub cta_href: String,
    pub subcopy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FooterSection {
    pub links: Vec<Link>,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A page's `sections` mapping. Absent sections are allowed in stored
/// documents; present ones must match their schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SectionsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<HeroSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_it_works: Option<HowItWorksSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<WhySection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories: Option<StoriesSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare: Option<CompareSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_cta: Option<FinalCtaSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<FooterSection>,
}

/// Dispatch a section key to the matching mutable document field.
macro_rules! with_section_field {
    ($doc:expr, $key:expr, |$field:ident| $body:expr) => {
        match $key {
            SectionKey::Hero => { let $field = &mut $doc.hero; $body }
            SectionKey::HowItWorks => { let $field = &mut $doc.how_it_works; $body }
            SectionKey::Pricing => { let $field = &mut $doc.pricing; $body }
            SectionKey::Why => { let $field = &mut $doc.why; $body }
            SectionKey::Stories => { let $field = &mut $doc.stories; $body }
            SectionKey::Compliance => { let $field = &mut $doc.compliance; $body }
            SectionKey::Compare => { let $field = &mut $doc.compare; $body }
            SectionKey::FinalCta => { let $field = &mut $doc.final_cta; $body }
            SectionKey::Footer => { let $field = &mut $doc.footer; $body }
        }
    };
}

impl SectionsDocument {
    /// Parse and shape-check a JSON document.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value)
            .map_err(|e| CoreError::invalid(format!("Sections do not match the schema: {e}")))
    }

    pub fn to_value(&self) -> serde_json::Value {
        // Serializing plain structs with string keys cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// JSON form of one section, or `None` when the section is absent.
    pub fn section_value(&self, key: SectionKey) -> Option<serde_json::Value> {
        fn encode<T: Serialize>(section: &Option<T>) -> Option<serde_json::Value> {
            section.as_ref().and_then(|s| serde_json::to_value(s).ok())
        }

        match key {
            SectionKey::Hero => encode(&self.hero),
            SectionKey::HowItWorks => encode(&self.how_it_works),
            SectionKey::Pricing => encode(&self.pricing),
            SectionKey::Why => encode(&self.why),
            SectionKey::Stories => encode(&self.stories),
            SectionKey::Compliance => encode(&self.compliance),
            SectionKey::Compare => encode(&self.compare),
            SectionKey::FinalCta => encode(&self.final_cta),
            SectionKey::Footer => encode(&self.footer),
        }
    }

    /// Replace one section with `value`, checking it against the section's
    /// schema. `path` is only used in the error message.
    pub fn set_section_value(
        &mut self,
        key: SectionKey,
        value: serde_json::Value,
        path: &str,
    ) -> Result<(), CoreError> {
        with_section_field!(self, key, |field| {
            let parsed = serde_json::from_value(value).map_err(|e| {
                CoreError::invalid_path(path, format!("value does not fit the {key} schema: {e}"))
            })?;
            *field = Some(parsed);
            Ok(())
        })
    }

    /// Section keys present in this document.
    pub fn present_keys(&self) -> Vec<SectionKey> {
        SectionKey::ALL
            .into_iter()
            .filter(|k| self.section_value(*k).is_some())
            .collect()
    }

    /// Every section present and every required field non-empty.
    ///
    /// Returns the list of problems as dotted paths.
    pub fn check_complete(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();
        let mut p = Problems {
            out: &mut problems,
        };

        match &self.hero {
            None => p.missing("hero"),
            Some(s) => {
                p.text("hero.headline", &s.headline);
                p.text("hero.subheadline", &s.subheadline);
                p.non_empty("hero.countries", &s.countries);
                for (i, c) in s.countries.iter().enumerate() {
                    p.text(&format!("hero.countries.{i}"), c);
                }
                p.text("hero.primaryCtaText", &s.primary_cta_text);
                p.text("hero.primaryCtaHref", &s.primary_cta_href);
                p.text("hero.visual.imageUrl", &s.visual.image_url);
            }
        }
        match &self.how_it_works {
            None => p.missing("howItWorks"),
            Some(s) => {
                p.text("howItWorks.headline", &s.headline);
                p.text("howItWorks.copy", &s.copy);
                p.non_empty("howItWorks.steps", &s.steps);
                for (i, step) in s.steps.iter().enumerate() {
                    p.titled(&format!("howItWorks.steps.{i}"), step);
                }
            }
        }
        match &self.pricing {
            None => p.missing("pricing"),
            Some(s) => {
                p.text("pricing.headline", &s.headline);
                p.text("pricing.copy", &s.copy);
                p.text("pricing.ctaText", &s.cta_text);
                p.text("pricing.ctaHref", &s.cta_href);
            }
        }
        match &self.why {
            None => p.missing("why"),
            Some(s) => {
                p.text("why.headline", &s.headline);
                p.non_empty("why.bullets", &s.bullets);
                for (i, b) in s.bullets.iter().enumerate() {
                    p.titled(&format!("why.bullets.{i}"), b);
                }
                for (i, b) in s.trust_badges.iter().enumerate() {
                    p.text(&format!("why.trustBadges.{i}.name"), &b.name);
                }
            }
        }
        match &self.stories {
            None => p.missing("stories"),
            Some(s) => {
                p.text("stories.headline", &s.headline);
                p.non_empty("stories.testimonials", &s.testimonials);
                for (i, t) in s.testimonials.iter().enumerate() {
                    p.text(&format!("stories.testimonials.{i}.quote"), &t.quote);
                    p.text(&format!("stories.testimonials.{i}.name"), &t.name);
                    p.text(&format!("stories.testimonials.{i}.location"), &t.location);
                }
            }
        }
        match &self.compliance {
            None => p.missing("compliance"),
            Some(s) => {
                p.text("compliance.headline", &s.headline);
                p.text("compliance.copy", &s.copy);
                p.text("compliance.linkText", &s.link_text);
                p.text("compliance.linkHref", &s.link_href);
                for (i, b) in s.badges.iter().enumerate() {
                    p.text(&format!("compliance.badges.{i}.name"), &b.name);
                }
            }
        }
        match &self.compare {
            None => p.missing("compare"),
            Some(s) => {
                p.text("compare.subcopy", &s.subcopy);
                p.text("compare.disclaimer", &s.disclaimer);
                for (k, m) in &s.microcopy_by_competitor {
                    p.text(&format!("compare.microcopyByCompetitor.{k}.tooltip"), &m.tooltip);
                }
            }
        }
        match &self.final_cta {
            None => p.missing("finalCta"),
            Some(s) => {
                p.text("finalCta.headline", &s.headline);
                p.text("finalCta.ctaText", &s.cta_text);
                p.text("finalCta.ctaHref", &s.cta_href);
                p.text("finalCta.subcopy", &s.subcopy);
            }
        }
        match &self.footer {
            None => p.missing("footer"),
            Some(s) => {
                p.non_empty("footer.links", &s.links);
                for (i, l) in s.links.iter().enumerate() {
                    p.text(&format!("footer.links.{i}.label"), &l.label);
                    p.text(&format!("footer.links.{i}.href"), &l.href);
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

struct Problems<'a> {
    out: &'a mut Vec<String>,
}

impl Problems<'_> {
    fn missing(&mut self, path: &str) {
        self.out.push(format!("{path}: section missing"));
    }

    fn text(&mut self, path: &str, value: &str) {
        if value.trim().is_empty() {
            self.out.push(format!("{path}: empty"));
        }
    }

    fn non_empty<T>(&mut self, path: &str, items: &[T]) {
        if items.is_empty() {
            self.out.push(format!("{path}: needs at least one item"));
        }
    }

    fn titled(&mut self, path: &str, item: &TitledText) {
        self.text(&format!("{path}.title"), &item.title);
        self.text(&format!("{path}.body"), &item.body);
    }
}
