//! Service (practice area) model and DTOs.

use archsite_core::error::CoreError;
use archsite_core::slug::{generate_slug, validate_slug};
use archsite_core::types::{DbId, Timestamp};
use archsite_core::validation::{not_blank, require, validate_max_len, MAX_LINE_LEN};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::collection::{
    trimmed, Changeset, Collection, CollectionSpec, Editable, FilterField, NewRecord, RecordPatch,
    CONTENT_ORDER,
};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub features: Vec<String>,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateService {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub features: Option<Vec<String>>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateService {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub features: Option<Vec<String>>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

impl Collection for Service {
    const SPEC: CollectionSpec = CollectionSpec::new(
        "services",
        "Service",
        "service",
        "id, title, slug, summary, description, icon, features, is_published, sort_order, \
         created_at, updated_at",
    )
    .searchable(&["title", "summary"])
    .filters(&[FilterField::boolean("is_published", "is_published")])
    .sortable(&["title", "sort_order", "created_at"])
    .ordered_by(CONTENT_ORDER)
    .default_limit(50)
    .published("is_published")
    .slugged("slug");
}

impl Editable for Service {
    type Create = CreateService;
    type Update = UpdateService;

    fn id(&self) -> DbId {
        self.id
    }
}

impl NewRecord for CreateService {
    fn prepare(&mut self) {
        self.title = trimmed(&self.title);
        self.slug = trimmed(&self.slug).or_else(|| self.title.as_deref().map(generate_slug));
    }

    fn validate(&self) -> Result<(), CoreError> {
        let title = require("Title", self.title.as_deref())?;
        validate_max_len("Title", title, MAX_LINE_LEN)?;
        validate_slug(self.slug.as_deref().unwrap_or_default())
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set("title", self.title.clone())
            .set("slug", self.slug.clone())
            .set("summary", self.summary.clone())
            .set("description", self.description.clone())
            .set("icon", trimmed(&self.icon))
            .set("features", self.features.clone().unwrap_or_default())
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}

impl RecordPatch for UpdateService {
    fn validate(&self) -> Result<(), CoreError> {
        not_blank("Title", self.title.as_deref())?;
        if let Some(slug) = &self.slug {
            validate_slug(slug)?;
        }
        Ok(())
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set_some("title", self.title.clone())
            .set_some("slug", self.slug.clone())
            .set_some("summary", self.summary.clone())
            .set_some("description", self.description.clone())
            .set_some("icon", self.icon.clone())
            .set_some("features", self.features.clone())
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}
