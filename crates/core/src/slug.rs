//! URL-safe slug generation for project landing pages.

use std::collections::HashSet;

/// Maximum length of the base slug (before any numeric suffix).
pub const MAX_SLUG_LEN: usize = 60;

/// Slug used when a client name has no usable characters.
pub const FALLBACK_SLUG: &str = "page";

/// Fold common Latin accented characters to ASCII.
fn fold(c: char) -> Option<char> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        c if c.is_ascii_alphanumeric() => c,
        _ => return None,
    };
    Some(folded)
}

/// Derive the base slug from a client name.
///
/// Lowercases, folds accents, turns every run of other characters into a
/// single `-`, and trims dashes from both ends.
///
/// ```
/// use pagesmith_core::slug::slugify;
///
/// assert_eq!(slugify("Acme Bank"), "acme-bank");
/// assert_eq!(slugify("  Banco São Paulo!! "), "banco-sao-paulo");
/// ```
pub fn slugify(client_name: &str) -> String {
    let mut slug = String::with_capacity(client_name.len());
    let mut pending_dash = false;

    for c in client_name.chars().flat_map(char::to_lowercase) {
        match fold(c) {
            Some(ok) => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(ok);
            }
            None => pending_dash = true,
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Generate a slug for `client_name` that is not in `existing`.
///
/// The first candidate is the bare slug; collisions are resolved by
/// appending `-2`, `-3`, ... The result depends only on the name and the
/// existing set.
pub fn generate_slug<S: AsRef<str>>(client_name: &str, existing: &[S]) -> String {
    let taken: HashSet<&str> = existing.iter().map(AsRef::as_ref).collect();
    let base = slugify(client_name);
    if !taken.contains(base.as_str()) {
        return base;
    }
    (2u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_slug() {
        assert_eq!(slugify("Acme Bank"), "acme-bank");
    }

    #[test]
    fn punctuation_collapses() {
        assert_eq!(slugify("Acme -- Bank & Trust, Inc."), "acme-bank-trust-inc");
    }

    #[test]
    fn accents_fold() {
        assert_eq!(slugify("Caixa Econômica"), "caixa-economica");
        assert_eq!(slugify("Peña Financiera"), "pena-financiera");
    }

    #[test]
    fn empty_falls_back() {
        assert_eq!(slugify("!!!"), FALLBACK_SLUG);
        assert_eq!(slugify(""), FALLBACK_SLUG);
    }

    #[test]
    fn long_names_truncate() {
        let name = "a".repeat(200);
        assert_eq!(slugify(&name).len(), MAX_SLUG_LEN);
    }

    #[test]
    fn unique_against_existing() {
        let none: [&str; 0] = [];
        assert_eq!(generate_slug("Acme Bank", &none), "acme-bank");
        assert_eq!(generate_slug("Acme Bank", &["acme-bank"]), "acme-bank-2");
        assert_eq!(
            generate_slug("Acme Bank", &["acme-bank", "acme-bank-2", "acme-bank-3"]),
            "acme-bank-4"
        );
    }

    #[test]
    fn gaps_are_filled_deterministically() {
        let existing = vec!["acme-bank".to_string(), "acme-bank-3".to_string()];
        assert_eq!(generate_slug("Acme Bank", &existing), "acme-bank-2");
        assert_eq!(generate_slug("Acme Bank", &existing), "acme-bank-2");
    }
}
