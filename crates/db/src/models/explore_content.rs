//! Explore content (articles, news, insights, case studies).

use archsite_core::error::CoreError;
use archsite_core::slug::{generate_slug, validate_slug};
use archsite_core::types::{DbId, Timestamp};
use archsite_core::validation::{
    not_blank, require, validate_max_len, validate_one_of, validate_optional_url,
    EXPLORE_CONTENT_TYPES, MAX_BODY_LEN, MAX_LINE_LEN,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::collection::{
    trimmed, Changeset, Collection, CollectionSpec, Editable, FilterField, NewRecord, OrderTerm,
    RecordPatch,
};

/// Explore listings read like a feed: manual order first, then the most
/// recently published.
const EXPLORE_ORDER: &[OrderTerm] = &[
    OrderTerm::asc("sort_order"),
    OrderTerm::desc("published_at"),
    OrderTerm::desc("created_at"),
];

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExploreContent {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub content_type: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub cover_image_url: Option<String>,
    pub author_id: Option<DbId>,
    pub tags: Vec<String>,
    pub published_at: Option<Timestamp>,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateExploreContent {
    pub title: Option<String>,
    pub slug: Option<String>,
    /// Defaults to `article` in the database.
    pub content_type: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub cover_image_url: Option<String>,
    pub author_id: Option<DbId>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<Timestamp>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExploreContent {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content_type: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub cover_image_url: Option<String>,
    pub author_id: Option<DbId>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<Timestamp>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

impl Collection for ExploreContent {
    const SPEC: CollectionSpec = CollectionSpec::new(
        "explore_content",
        "Explore item",
        "explore item",
        "id, title, slug, content_type, excerpt, body, cover_image_url, author_id, tags, \
         published_at, is_published, sort_order, created_at, updated_at",
    )
    .searchable(&["title", "excerpt"])
    .filters(&[
        FilterField::text("type", "content_type"),
        FilterField::integer("author_id", "author_id"),
        FilterField::boolean("is_published", "is_published"),
    ])
    .sortable(&["title", "published_at", "sort_order", "created_at"])
    .ordered_by(EXPLORE_ORDER)
    .default_limit(12)
    .published("is_published")
    .slugged("slug");
}

impl Editable for ExploreContent {
    type Create = CreateExploreContent;
    type Update = UpdateExploreContent;

    fn id(&self) -> DbId {
        self.id
    }
}

fn validate_common(
    content_type: Option<&str>,
    body: Option<&str>,
    cover: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(ct) = content_type {
        validate_one_of("content type", ct, EXPLORE_CONTENT_TYPES)?;
    }
    if let Some(body) = body {
        validate_max_len("Body", body, MAX_BODY_LEN)?;
    }
    validate_optional_url("Cover image URL", cover)
}

impl NewRecord for CreateExploreContent {
    fn prepare(&mut self) {
        self.title = trimmed(&self.title);
        self.slug = trimmed(&self.slug).or_else(|| self.title.as_deref().map(generate_slug));
        // Publishing without a date stamps it now.
        if self.is_published == Some(true) && self.published_at.is_none() {
            self.published_at = Some(chrono::Utc::now());
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        let title = require("Title", self.title.as_deref())?;
        validate_max_len("Title", title, MAX_LINE_LEN)?;
        validate_slug(self.slug.as_deref().unwrap_or_default())?;
        validate_common(
            self.content_type.as_deref(),
            self.body.as_deref(),
            self.cover_image_url.as_deref(),
        )
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set("title", self.title.clone())
            .set("slug", self.slug.clone())
            .set_some("content_type", self.content_type.clone())
            .set("excerpt", self.excerpt.clone())
            .set("body", self.body.clone())
            .set("cover_image_url", trimmed(&self.cover_image_url))
            .set("author_id", self.author_id)
            .set("tags", self.tags.clone().unwrap_or_default())
            .set("published_at", self.published_at)
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}

impl RecordPatch for UpdateExploreContent {
    fn validate(&self) -> Result<(), CoreError> {
        not_blank("Title", self.title.as_deref())?;
        if let Some(slug) = &self.slug {
            validate_slug(slug)?;
        }
        validate_common(
            self.content_type.as_deref(),
            self.body.as_deref(),
            self.cover_image_url.as_deref(),
        )
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set_some("title", self.title.clone())
            .set_some("slug", self.slug.clone())
            .set_some("content_type", self.content_type.clone())
            .set_some("excerpt", self.excerpt.clone())
            .set_some("body", self.body.clone())
            .set_some("cover_image_url", self.cover_image_url.clone())
            .set_some("author_id", self.author_id)
            .set_some("tags", self.tags.clone())
            .set_some("published_at", self.published_at)
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn publishing_stamps_published_at() {
        let mut item = CreateExploreContent {
            title: Some("Timber at scale".into()),
            is_published: Some(true),
            ..Default::default()
        };
        item.prepare();
        assert!(item.published_at.is_some());
        assert_eq!(item.slug(), Some("timber-at-scale"));
    }

    #[test]
    fn drafts_have_no_publish_date() {
        let mut item = CreateExploreContent {
            title: Some("Draft".into()),
            ..Default::default()
        };
        item.prepare();
        assert!(item.published_at.is_none());
    }

    #[test]
    fn unknown_content_type_is_rejected() {
        let patch = UpdateExploreContent {
            content_type: Some("podcast".into()),
            ..Default::default()
        };
        assert_matches!(
            patch.validate(),
            Err(CoreError::Validation(msg)) if msg.starts_with("Invalid content type 'podcast'")
        );
    }

    #[test]
    fn type_query_param_maps_to_content_type() {
        let spec = ExploreContent::SPEC;
        assert_eq!(spec.filter("type").map(|f| f.column), Some("content_type"));
    }
}
