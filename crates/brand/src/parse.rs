//! Pure HTML/CSS signal extraction.
//!
//! This is deliberately shallow: it reads the tags and inline CSS of the
//! landing document only and never follows linked stylesheets.

use std::collections::HashMap;
use std::sync::LazyLock;

use pagesmith_core::project::{BrandStyle, Language};
use pagesmith_core::templates::parse_hex_color;
use regex::Regex;
use url::Url;

use crate::ExtractedBrand;

/// Maximum number of font families kept, in order of first appearance.
pub const MAX_FONT_FAMILIES: usize = 4;

/// Maximum length of the derived style notes, in characters.
pub const MAX_STYLE_NOTES_CHARS: usize = 280;

/// Colors whose channels are all within this distance count as neutral
/// (white, black, grays) and never become brand colors by frequency.
const NEUTRAL_SPREAD: u8 = 24;

const GENERIC_FONTS: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "ui-sans-serif",
    "ui-serif",
    "ui-monospace",
    "-apple-system",
    "blinkmacsystemfont",
    "inherit",
    "initial",
    "unset",
];

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(meta|link|img|html)\b([^>]*)>").expect("valid regex"));

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid regex")
});

static STYLE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>(.*?)</style>").expect("valid regex"));

static STYLE_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\sstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9a-fA-F]{6}|[0-9a-fA-F]{3})\b").expect("valid regex"));

static FONT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)font-family\s*:\s*([^;}]+)").expect("valid regex"));

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Extract brand signals from `html`, resolving relative URLs against
/// `base` (the final URL the page was served from).
pub fn parse_brand(html: &str, base: &Url) -> ExtractedBrand {
    let tags = collect_tags(html);
    let css = collect_css(html);

    let mut theme_color = None;
    let mut description = None;
    let mut og_image = None;
    let mut favicon = None;
    let mut touch_icon = None;
    let mut logo = None;
    let mut lang = None;

    for (name, attrs) in &tags {
        match name.as_str() {
            "meta" => {
                let key = attrs
                    .get("name")
                    .or_else(|| attrs.get("property"))
                    .map(|k| k.to_ascii_lowercase());
                let content = attrs.get("content").map(|c| c.trim()).filter(|c| !c.is_empty());
                match (key.as_deref(), content) {
                    (Some("theme-color"), Some(c)) => {
                        theme_color = theme_color.or_else(|| normalize_color(c))
                    }
                    (Some("description"), Some(c)) => description = Some(c.to_string()),
                    (Some("og:description"), Some(c)) => {
                        description = description.or_else(|| Some(c.to_string()))
                    }
                    (Some("og:image"), Some(c)) => og_image = og_image.or_else(|| resolve(base, c)),
                    _ => {}
                }
            }
            "link" => {
                let (Some(rel), Some(href)) = (attrs.get("rel"), attrs.get("href")) else {
                    continue;
                };
                let rel = rel.to_ascii_lowercase();
                let tokens: Vec<&str> = rel.split_whitespace().collect();
                if tokens.contains(&"icon") {
                    favicon = favicon.or_else(|| resolve(base, href));
                } else if tokens.contains(&"apple-touch-icon") {
                    touch_icon = touch_icon.or_else(|| resolve(base, href));
                }
            }
            "img" => {
                if logo.is_some() {
                    continue;
                }
                let Some(src) = attrs.get("src") else { continue };
                let mentions_logo = ["alt", "class", "id", "src"].iter().any(|a| {
                    attrs
                        .get(*a)
                        .is_some_and(|v| v.to_ascii_lowercase().contains("logo"))
                });
                if mentions_logo {
                    logo = resolve(base, src);
                }
            }
            "html" => lang = attrs.get("lang").and_then(|l| Language::from_lang_tag(l)),
            _ => {}
        }
    }

    let mut palette = rank_colors(&css);
    if let Some(theme) = &theme_color {
        palette.retain(|c| c != theme);
        palette.insert(0, theme.clone());
    }
    let mut palette = palette.into_iter();

    ExtractedBrand {
        style: BrandStyle {
            primary_color: palette.next(),
            secondary_color: palette.next(),
            accent_color: palette.next(),
            font_families: font_families(&css),
            logo_url: logo.or(og_image),
            favicon_url: favicon
                .or(touch_icon)
                .or_else(|| resolve(base, "/favicon.ico")),
            style_notes: description.map(|d| clean_notes(&d)).filter(|d| !d.is_empty()),
        },
        detected_language: lang,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn collect_tags(html: &str) -> Vec<(String, HashMap<String, String>)> {
    TAG_RE
        .captures_iter(html)
        .map(|cap| {
            let name = cap[1].to_ascii_lowercase();
            let attrs = ATTR_RE
                .captures_iter(&cap[2])
                .map(|a| {
                    let value = a
                        .get(2)
                        .or_else(|| a.get(3))
                        .or_else(|| a.get(4))
                        .map_or("", |m| m.as_str());
                    (a[1].to_ascii_lowercase(), decode_entities(value))
                })
                .collect();
            (name, attrs)
        })
        .collect()
}

/// Concatenate `<style>` blocks and inline `style="..."` attributes.
fn collect_css(html: &str) -> String {
    let mut css = String::new();
    for cap in STYLE_BLOCK_RE.captures_iter(html) {
        css.push_str(&cap[1]);
        css.push('\n');
    }
    for cap in STYLE_ATTR_RE.captures_iter(html) {
        if let Some(m) = cap.get(1).or_else(|| cap.get(2)) {
            css.push_str(m.as_str());
            css.push_str(";\n");
        }
    }
    css
}

fn normalize_color(value: &str) -> Option<String> {
    let (r, g, b) = parse_hex_color(value)?;
    Some(format!("#{r:02x}{g:02x}{b:02x}"))
}

fn is_neutral(color: &str) -> bool {
    match parse_hex_color(color) {
        Some((r, g, b)) => {
            let max = r.max(g).max(b);
            let min = r.min(g).min(b);
            max - min < NEUTRAL_SPREAD
        }
        None => true,
    }
}

/// Non-neutral colors by descending frequency, ties broken by first use.
fn rank_colors(css: &str) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for m in HEX_RE.find_iter(css) {
        let Some(color) = normalize_color(m.as_str()) else {
            continue;
        };
        if is_neutral(&color) {
            continue;
        }
        match counts.iter_mut().find(|(c, _)| *c == color) {
            Some((_, n)) => *n += 1,
            None => counts.push((color, 1)),
        }
    }
    // Stable sort keeps first-use order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().map(|(c, _)| c).collect()
}

fn font_families(css: &str) -> Vec<String> {
    let mut fonts: Vec<String> = Vec::new();
    for cap in FONT_RE.captures_iter(css) {
        for raw in cap[1].split(',') {
            let name = raw
                .trim()
                .trim_end_matches("!important")
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim();
            if name.is_empty() || name.starts_with("var(") {
                continue;
            }
            let lower = name.to_ascii_lowercase();
            if GENERIC_FONTS.contains(&lower.as_str()) {
                continue;
            }
            if !fonts.iter().any(|f| f.eq_ignore_ascii_case(name)) {
                fonts.push(name.to_string());
            }
            if fonts.len() == MAX_FONT_FAMILIES {
                return fonts;
            }
        }
    }
    fonts
}

/// Resolve `href` against `base`, keeping only http(s) results.
fn resolve(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let url = base.join(href).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn clean_notes(description: &str) -> String {
    let collapsed = description.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_STYLE_NOTES_CHARS).collect()
}
