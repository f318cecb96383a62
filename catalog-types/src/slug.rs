//! URL and filename slugs for catalog routes and upload names.

pub const SLUG_FALLBACK: &str = "item";
pub const CATEGORY_FALLBACK: &str = "kmu";

/// URL slug from an arbitrary title. Lowercases, folds `ё` to `е`, keeps
/// latin/cyrillic letters, digits, whitespace and dashes, turns whitespace
/// runs into single dashes. Empty results become `"item"`.
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase().replace('ё', "е");
    let kept: String = lowered
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | 'а'..='я' | '-') || c.is_whitespace())
        .collect();
    let dashed = kept.split_whitespace().collect::<Vec<_>>().join("-");
    let slug = collapse_dashes(&dashed);
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        SLUG_FALLBACK.to_string()
    } else {
        slug.to_string()
    }
}

/// Category token restricted to `[a-z0-9_-]`; anything else is dropped.
/// Empty results fall back to the default category.
pub fn sanitize_category(input: &str) -> String {
    let token: String = input
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-'))
        .collect();
    if token.is_empty() {
        CATEGORY_FALLBACK.to_string()
    } else {
        token
    }
}

/// Filename-safe slug: latin letters, digits, `_` and `-` only, runs of
/// anything else become a single dash.
pub fn safe_filename(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut gap = false;
    for c in lowered.chars() {
        if matches!(c, 'a'..='z' | '0'..='9' | '_' | '-') {
            out.push(c);
            gap = false;
        } else if !gap {
            out.push('-');
            gap = true;
        }
    }
    let out = collapse_dashes(&out);
    let out = out.trim_matches('-');
    if out.is_empty() {
        SLUG_FALLBACK.to_string()
    } else {
        out.to_string()
    }
}

fn collapse_dashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_dash = false;
    for c in s.chars() {
        if c == '-' {
            if !prev_dash {
                out.push(c);
            }
            prev_dash = true;
        } else {
            out.push(c);
            prev_dash = false;
        }
    }
    out
}
