//! Slug derivation and validation.
//!
//! Slugs are the URL segments of every generated page, so they are held to
//! a strict shape: lowercase ASCII letters and digits separated by single
//! dashes. [`slugify`] decomposes names (NFKD), drops the combining marks
//! and folds the few Latin letters that have no decomposition (`ß`, `ø`,
//! `ł`, ...) before sanitizing:
//!
//! - `"Faro"` → `"faro"`
//! - `"São Brás de Alportel"` → `"sao-bras-de-alportel"`
//! - `"Póvoa de Varzim"` → `"povoa-de-varzim"`

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Derive a slug from a display name.
pub fn slugify(name: &str) -> String {
    let mapped: String = name
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(fold_letter)
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    let mut collapsed = String::with_capacity(mapped.len());
    let mut prev_dash = false;
    for c in mapped.chars() {
        if c == '-' {
            if !prev_dash {
                collapsed.push('-');
            }
            prev_dash = true;
        } else {
            collapsed.push(c);
            prev_dash = false;
        }
    }

    collapsed.trim_matches('-').to_string()
}

/// Check that a string is already in canonical slug form.
pub fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && !s.ends_with('-')
        && !s.contains("--")
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn fold_letter(c: char) -> Vec<char> {
    match c {
        'ß' => vec!['s', 's'],
        'æ' => vec!['a', 'e'],
        'Æ' => vec!['A', 'E'],
        'œ' => vec!['o', 'e'],
        'Œ' => vec!['O', 'E'],
        'ø' => vec!['o'],
        'Ø' => vec!['O'],
        'ł' => vec!['l'],
        'Ł' => vec!['L'],
        'đ' => vec!['d'],
        'Đ' => vec!['D'],
        other => vec![other],
    }
}
