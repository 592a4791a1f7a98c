//! Slug and anchor derivation.

use std::collections::HashSet;

use crate::analyzer::emoji::strip_leading_emoji;
use crate::constants::navigation::FALLBACK_SLUG;

/// Derive a path-safe slug from heading text.
///
/// Lower-cases, drops a leading emoji, replaces every run of whitespace or
/// non-path-safe characters with a single hyphen, and caps the length at
/// `max_len` characters.
pub fn slugify(text: &str, max_len: usize) -> String {
    let text = strip_leading_emoji(text.trim());
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    let truncated: String = slug.chars().take(max_len.max(1)).collect();
    let truncated = truncated.trim_matches('-');
    if truncated.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        truncated.to_string()
    }
}

/// Heading anchor as generated by the site's table-of-contents extension.
///
/// Keeps Unicode word characters, so accented and non-Latin headings keep
/// their letters.
pub fn anchor(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_lowercase();

    let mut result = String::with_capacity(cleaned.len());
    let mut in_separator = false;
    for c in cleaned.chars() {
        if c == '-' || c.is_whitespace() {
            if !in_separator {
                result.push('-');
            }
            in_separator = true;
        } else {
            result.push(c);
            in_separator = false;
        }
    }
    result.trim_matches('-').to_string()
}

/// Allocates unique anchors, suffixing repeats with `_1`, `_2`, …
#[derive(Debug, Default)]
pub struct AnchorSet {
    used: HashSet<String>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique(&mut self, text: &str) -> String {
        let base = anchor(text);
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}_{}", base, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Result of a slug allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocated {
    pub slug: String,
    /// Whether a numeric disambiguator was appended
    pub collided: bool,
}

/// Hands out unique slugs within one directory scope, in call order.
///
/// The first request for a slug keeps it unsuffixed; later requests get
/// `-2`, `-3`, ….
#[derive(Debug, Default, Clone)]
pub struct SlugScope {
    taken: HashSet<String>,
}

impl SlugScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope where `reserved` names are unavailable from the start
    pub fn with_reserved<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            taken: reserved.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn allocate(&mut self, base: &str) -> Allocated {
        if self.taken.insert(base.to_string()) {
            return Allocated {
                slug: base.to_string(),
                collided: false,
            };
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if self.taken.insert(candidate.clone()) {
                return Allocated {
                    slug: candidate,
                    collided: true,
                };
            }
            n += 1;
        }
    }
}
