//! Project category model and DTOs.

use archsite_core::error::CoreError;
use archsite_core::slug::{generate_slug, validate_slug};
use archsite_core::types::{DbId, Timestamp};
use archsite_core::validation::{not_blank, require, validate_max_len, MAX_LINE_LEN};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::collection::{
    trimmed, Changeset, Collection, CollectionSpec, Dependent, Editable, NewRecord, RecordPatch,
    CONTENT_ORDER,
};

/// A row from the `project_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectCategory {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProjectCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

impl Collection for ProjectCategory {
    const SPEC: CollectionSpec = CollectionSpec::new(
        "project_categories",
        "Project category",
        "project category",
        "id, name, slug, description, is_published, sort_order, created_at, updated_at",
    )
    .searchable(&["name", "description"])
    .sortable(&["name", "sort_order"])
    .ordered_by(CONTENT_ORDER)
    .default_limit(50)
    .published("is_published")
    .slugged("slug");
}

impl Editable for ProjectCategory {
    type Create = CreateProjectCategory;
    type Update = UpdateProjectCategory;

    /// Projects keep existing; they just lose their category.
    const DEPENDENTS: &'static [Dependent] = &[Dependent::nullify("projects", "category_id")];

    fn id(&self) -> DbId {
        self.id
    }
}

impl NewRecord for CreateProjectCategory {
    fn prepare(&mut self) {
        self.name = trimmed(&self.name);
        self.slug = trimmed(&self.slug).or_else(|| self.name.as_deref().map(generate_slug));
    }

    fn validate(&self) -> Result<(), CoreError> {
        let name = require("Name", self.name.as_deref())?;
        validate_max_len("Name", name, MAX_LINE_LEN)?;
        validate_slug(self.slug.as_deref().unwrap_or_default())
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set("name", self.name.clone())
            .set("slug", self.slug.clone())
            .set("description", self.description.clone())
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}

impl RecordPatch for UpdateProjectCategory {
    fn validate(&self) -> Result<(), CoreError> {
        not_blank("Name", self.name.as_deref())?;
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
            .set_some("name", self.name.clone())
            .set_some("slug", self.slug.clone())
            .set_some("description", self.description.clone())
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}
