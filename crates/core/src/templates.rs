//! Static template catalog and the automatic template selector.

use serde::Serialize;

use crate::project::{BrandStyle, TEMPLATE_AUTO};

/// A template the rendering layer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const TEMPLATE_CLASSIC: &str = "classic";
pub const TEMPLATE_BOLD: &str = "bold";
pub const TEMPLATE_MINIMAL: &str = "minimal";

/// Every concrete template, in display order.
pub const TEMPLATES: &[TemplateInfo] = &[
    TemplateInfo {
        key: TEMPLATE_CLASSIC,
        name: "Classic Trust",
        description: "Balanced layout with a light hero and brand-colored accents.",
    },
    TemplateInfo {
        key: TEMPLATE_BOLD,
        name: "Bold Impact",
        description: "Full-bleed hero on the brand's primary color for high-contrast brands.",
    },
    TemplateInfo {
        key: TEMPLATE_MINIMAL,
        name: "Clean Minimal",
        description: "Typography-led layout for brands without a strong visual identity.",
    },
];

/// Contrast ratio against white at or above which a primary color is
/// considered strong enough to carry a full-bleed hero (WCAG AA).
pub const BOLD_CONTRAST_THRESHOLD: f64 = 4.5;

pub fn is_known_template(key: &str) -> bool {
    TEMPLATES.iter().any(|t| t.key == key)
}

/// Resolve the requested template key to a concrete one.
///
/// Explicit keys are returned unchanged (unknown ones are logged). For
/// `auto` the rule set is:
///
/// 1. A parseable primary color with contrast >= [`BOLD_CONTRAST_THRESHOLD`]
///    against white selects `bold`.
/// 2. Otherwise a brand with a logo selects `classic`.
/// 3. Otherwise `minimal`.
pub fn select_template(brand: &BrandStyle, requested: &str) -> String {
    if requested != TEMPLATE_AUTO {
        if !is_known_template(requested) {
            tracing::warn!(template_key = requested, "Requested template is not in the catalog");
        }
        return requested.to_string();
    }

    let strong_primary = brand
        .primary_color
        .as_deref()
        .and_then(parse_hex_color)
        .map(|rgb| contrast_ratio(rgb, (255, 255, 255)) >= BOLD_CONTRAST_THRESHOLD)
        .unwrap_or(false);

    let key = if strong_primary {
        TEMPLATE_BOLD
    } else if brand.logo_url.is_some() {
        TEMPLATE_CLASSIC
    } else {
        TEMPLATE_MINIMAL
    };
    key.to_string()
}

/// Parse `#rgb` or `#rrggbb` (case-insensitive, `#` optional).
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Relative luminance per WCAG 2.x.
pub fn relative_luminance((r, g, b): (u8, u8, u8)) -> f64 {
    fn linear(c: u8) -> f64 {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

pub fn contrast_ratio(a: (u8, u8, u8), b: (u8, u8, u8)) -> f64 {
    let (la, lb) = (relative_luminance(a), relative_luminance(b));
    let (hi, lo) = if la > lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}
