//! Field-level validation helpers and the allowed value sets for
//! enumerated text columns.

use validator::{ValidateEmail, ValidateUrl};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Allowed value sets
// ---------------------------------------------------------------------------

pub const PROJECT_STATUSES: &[&str] = &["planned", "in_progress", "completed"];

pub const EXPLORE_CONTENT_TYPES: &[&str] = &["article", "news", "insight", "case_study"];

pub const EMPLOYMENT_TYPES: &[&str] = &["full_time", "part_time", "contract", "internship"];

pub const CONTACT_STATUSES: &[&str] = &["new", "read", "replied", "archived"];

pub const CONTACT_STATUS_NEW: &str = "new";

pub const SUBSCRIBER_STATUS_SUBSCRIBED: &str = "subscribed";
pub const SUBSCRIBER_STATUS_UNSUBSCRIBED: &str = "unsubscribed";

/// Longest free-text body accepted for messages and long descriptions.
pub const MAX_BODY_LEN: usize = 50_000;

/// Longest single-line text field (names, titles, subjects).
pub const MAX_LINE_LEN: usize = 300;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Require a present, non-blank value. Returns the trimmed value.
pub fn require<'a>(label: &str, value: Option<&'a str>) -> Result<&'a str, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::Validation(format!("{label} is required"))),
    }
}

/// Reject a value that was supplied but is blank.
pub fn not_blank(label: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(CoreError::Validation(format!(
            "{label} must not be empty"
        ))),
        _ => Ok(()),
    }
}

pub fn validate_max_len(label: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{label} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), CoreError> {
    if !value.trim().validate_email() {
        return Err(CoreError::Validation(format!(
            "'{value}' is not a valid email address"
        )));
    }
    Ok(())
}

pub fn validate_url(label: &str, value: &str) -> Result<(), CoreError> {
    if !value.validate_url() {
        return Err(CoreError::Validation(format!("{label} must be a valid URL")));
    }
    Ok(())
}

/// Validate an optional URL field, ignoring `None`.
pub fn validate_optional_url(label: &str, value: Option<&str>) -> Result<(), CoreError> {
    value.map_or(Ok(()), |v| validate_url(label, v))
}

/// Validate a value against a known set.
pub fn validate_one_of(label: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if !allowed.contains(&value) {
        return Err(CoreError::Validation(format!(
            "Invalid {label} '{value}'. Valid values: {}",
            allowed.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn require_trims_and_rejects_blank() {
        assert_eq!(require("Name", Some("  Acme ")).unwrap(), "Acme");
        assert_matches!(
            require("Name", Some("   ")),
            Err(CoreError::Validation(msg)) if msg == "Name is required"
        );
        assert_matches!(require("Name", None), Err(CoreError::Validation(_)));
    }

    #[test]
    fn not_blank_allows_absent() {
        assert!(not_blank("Title", None).is_ok());
        assert!(not_blank("Title", Some("x")).is_ok());
        assert!(not_blank("Title", Some(" ")).is_err());
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("studio@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn url_validation() {
        assert!(validate_url("Website", "https://acme.example").is_ok());
        assert!(validate_url("Website", "acme").is_err());
        assert!(validate_optional_url("Website", None).is_ok());
    }

    #[test]
    fn one_of_lists_valid_values() {
        assert!(validate_one_of("status", "completed", PROJECT_STATUSES).is_ok());
        assert_matches!(
            validate_one_of("status", "done", PROJECT_STATUSES),
            Err(CoreError::Validation(msg)) if msg.contains("planned, in_progress, completed")
        );
    }

    #[test]
    fn max_len_counts_chars() {
        assert!(validate_max_len("Title", "ééé", 3).is_ok());
        assert!(validate_max_len("Title", "éééé", 3).is_err());
    }
}
