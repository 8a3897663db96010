//! URL slug generation and validation.

use crate::error::CoreError;

/// Longest slug accepted on create or update.
pub const MAX_SLUG_LEN: usize = 200;

/// Derive a slug from a title: lowercase ASCII alphanumerics separated by
/// single hyphens, cut at a hyphen to at most [`MAX_SLUG_LEN`] characters.
pub fn generate_slug(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_hyphen = true;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    if result.len() > MAX_SLUG_LEN {
        let cut = match result[..=MAX_SLUG_LEN].rfind('-') {
            Some(hyphen) if hyphen > 0 => hyphen,
            _ => MAX_SLUG_LEN,
        };
        result.truncate(cut);
    }

    while result.ends_with('-') {
        result.pop();
    }
    result
}

/// Validate a caller-supplied slug.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens".into(),
        ));
    }
    Ok(())
}
