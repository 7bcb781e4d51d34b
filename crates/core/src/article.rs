//! Article content helpers: slug generation, word count, excerpts.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum length for an article title.
pub const MAX_TITLE_LENGTH: usize = 300;

/// Maximum length for an explicit slug.
pub const MAX_SLUG_LENGTH: usize = 120;

/// Length of a derived excerpt, in characters.
pub const EXCERPT_LENGTH: usize = 200;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

/// Validate a title: non-blank and at most [`MAX_TITLE_LENGTH`] characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a caller-supplied slug (lowercase, hyphen-separated, URL-safe).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.len() > MAX_SLUG_LENGTH || !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single hyphens"
        )));
    }
    Ok(())
}

/// Derive a URL-safe slug from a title.
///
/// ```
/// use masthead_core::article::slugify;
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Rust 2024: What's New?  "), "rust-2024-what-s-new");
/// assert_eq!(slugify("!!!"), "untitled");
/// ```
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let collapsed = NON_SLUG_RE.replace_all(&lower, "-");
    let mut slug = collapsed.trim_matches('-').to_string();

    if slug.len() > MAX_SLUG_LENGTH {
        slug.truncate(MAX_SLUG_LENGTH);
        slug = slug.trim_end_matches('-').to_string();
    }

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Append a numeric suffix to a slug for collision resolution.
pub fn slug_with_suffix(base: &str, n: u32) -> String {
    if n <= 1 {
        base.to_string()
    } else {
        format!("{base}-{n}")
    }
}

/// Strip markup from a body and collapse whitespace.
fn plain_text(body: &str) -> String {
    let stripped = TAG_RE.replace_all(body, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Count words in an article body, ignoring markup.
pub fn word_count(body: &str) -> i32 {
    let count = TAG_RE.replace_all(body, " ").split_whitespace().count();
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Derive an excerpt from the body: plain text cut at a word boundary.
pub fn derive_excerpt(body: &str) -> String {
    let text = plain_text(body);
    if text.chars().count() <= EXCERPT_LENGTH {
        return text;
    }

    let cut: String = text.chars().take(EXCERPT_LENGTH).collect();
    let trimmed = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}...", trimmed.trim_end_matches([',', '.', ';', ':']))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("The  Quick -- Brown Fox"), "the-quick-brown-fox");
    }

    #[test]
    fn slugify_falls_back_to_untitled() {
        assert_eq!(slugify(""), "untitled");
        assert_eq!(slugify("???"), "untitled");
    }

    #[test]
    fn slugify_truncates_long_titles() {
        let slug = slugify(&"word ".repeat(100));
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn suffix_applied_after_first() {
        assert_eq!(slug_with_suffix("post", 1), "post");
        assert_eq!(slug_with_suffix("post", 3), "post-3");
    }

    #[test]
    fn validate_slug_accepts_kebab_case() {
        assert!(validate_slug("editors-pick-2026").is_ok());
        assert!(validate_slug("Bad Slug").is_err());
        assert!(validate_slug("double--hyphen").is_err());
        assert!(validate_slug("-leading").is_err());
    }

    #[test]
    fn title_must_not_be_blank() {
        assert!(validate_title("   ").is_err());
        assert!(validate_title("Launch day").is_ok());
        assert!(validate_title(&"t".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn word_count_ignores_markup() {
        assert_eq!(word_count("<p>One two</p><p>three</p>"), 3);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   spaced\n\tout  words "), 3);
    }

    #[test]
    fn short_body_excerpt_is_whole_text() {
        assert_eq!(derive_excerpt("<p>Short body.</p>"), "Short body.");
    }

    #[test]
    fn long_body_excerpt_cut_at_word_boundary() {
        let body = "alpha ".repeat(80);
        let excerpt = derive_excerpt(&body);
        assert!(excerpt.ends_with("alpha..."));
        assert!(excerpt.chars().count() <= EXCERPT_LENGTH + 3);
    }
}
