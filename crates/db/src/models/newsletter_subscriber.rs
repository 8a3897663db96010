//! Newsletter subscribers, keyed by a unique email address.

use archsite_core::error::CoreError;
use archsite_core::types::{DbId, Timestamp};
use archsite_core::validation::{require, validate_email};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::collection::{Collection, CollectionSpec, FilterField, NEWEST_FIRST};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NewsletterSubscriber {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub status: String,
    pub subscribed_at: Timestamp,
    pub unsubscribed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /public/newsletter`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Body of `POST /public/newsletter/unsubscribe`.
#[derive(Debug, Clone, Deserialize)]
pub struct UnsubscribeRequest {
    pub email: Option<String>,
}

/// Trim, lowercase and validate a subscriber email.
pub fn normalize_email(raw: Option<&str>) -> Result<String, CoreError> {
    let email = require("Email", raw)?.to_lowercase();
    validate_email(&email)?;
    Ok(email)
}

impl Collection for NewsletterSubscriber {
    const SPEC: CollectionSpec = CollectionSpec::new(
        "newsletter_subscribers",
        "Subscriber",
        "subscriber",
        "id, email, name, status, subscribed_at, unsubscribed_at, created_at, updated_at",
    )
    .searchable(&["email", "name"])
    .filters(&[FilterField::text("status", "status")])
    .sortable(&["email", "status", "subscribed_at", "created_at"])
    .ordered_by(NEWEST_FIRST)
    .default_limit(50);
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn emails_are_normalized() {
        assert_eq!(
            normalize_email(Some("  Reader@Example.COM ")).unwrap(),
            "reader@example.com"
        );
    }

    #[test]
    fn bad_emails_are_rejected() {
        assert_matches!(normalize_email(None), Err(CoreError::Validation(_)));
        assert_matches!(
            normalize_email(Some("reader")),
            Err(CoreError::Validation(msg)) if msg.contains("not a valid email")
        );
    }
}
