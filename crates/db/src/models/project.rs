//! Project model, DTOs and the public detail view.

use archsite_core::error::CoreError;
use archsite_core::slug::{generate_slug, validate_slug};
use archsite_core::types::{DbId, Timestamp};
use archsite_core::validation::{
    not_blank, require, validate_max_len, validate_one_of, validate_optional_url, MAX_LINE_LEN,
    PROJECT_STATUSES,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::collection::{
    trimmed, Changeset, Collection, CollectionSpec, Dependent, Editable, FilterField, NewRecord,
    RecordPatch, CONTENT_ORDER,
};
use crate::models::partner::Partner;
use crate::models::project_category::ProjectCategory;

/// Earliest plausible completion year.
const MIN_YEAR: i32 = 1800;
const MAX_YEAR: i32 = 2200;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub location: Option<String>,
    pub year: Option<i32>,
    pub status: String,
    pub cover_image_url: Option<String>,
    pub gallery: Vec<String>,
    pub is_featured: bool,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project. `slug` is derived from `title` when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProject {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub location: Option<String>,
    pub year: Option<i32>,
    /// Defaults to `completed` in the database.
    pub status: Option<String>,
    pub cover_image_url: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

/// DTO for updating a project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub location: Option<String>,
    pub year: Option<i32>,
    pub status: Option<String>,
    pub cover_image_url: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Body of `PUT /admin/projects/{id}/partners`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetProjectPartners {
    pub partner_ids: Vec<DbId>,
}

/// A project with its category and partners resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub category: Option<ProjectCategory>,
    pub partners: Vec<Partner>,
}

impl Collection for Project {
    const SPEC: CollectionSpec = CollectionSpec::new(
        "projects",
        "Project",
        "project",
        "id, title, slug, summary, description, category_id, location, year, status, \
         cover_image_url, gallery, is_featured, is_published, sort_order, created_at, updated_at",
    )
    .searchable(&["title", "summary", "location"])
    .filters(&[
        FilterField::text("status", "status"),
        FilterField::integer("category_id", "category_id"),
        FilterField::integer("year", "year"),
        FilterField::boolean("featured", "is_featured"),
        FilterField::boolean("is_published", "is_published"),
    ])
    .sortable(&["title", "year", "sort_order", "created_at", "updated_at"])
    .ordered_by(CONTENT_ORDER)
    .default_limit(12)
    .published("is_published")
    .slugged("slug");
}

impl Editable for Project {
    type Create = CreateProject;
    type Update = UpdateProject;

    const DEPENDENTS: &'static [Dependent] = &[Dependent::delete("project_partners", "project_id")];

    fn id(&self) -> DbId {
        self.id
    }
}

fn validate_year(year: Option<i32>) -> Result<(), CoreError> {
    match year {
        Some(y) if !(MIN_YEAR..=MAX_YEAR).contains(&y) => Err(CoreError::Validation(format!(
            "Year must be between {MIN_YEAR} and {MAX_YEAR}"
        ))),
        _ => Ok(()),
    }
}

impl NewRecord for CreateProject {
    fn prepare(&mut self) {
        self.title = trimmed(&self.title);
        self.slug = trimmed(&self.slug).or_else(|| self.title.as_deref().map(generate_slug));
    }

    fn validate(&self) -> Result<(), CoreError> {
        let title = require("Title", self.title.as_deref())?;
        validate_max_len("Title", title, MAX_LINE_LEN)?;
        validate_slug(self.slug.as_deref().unwrap_or_default())?;
        if let Some(status) = &self.status {
            validate_one_of("status", status, PROJECT_STATUSES)?;
        }
        validate_year(self.year)?;
        validate_optional_url("Cover image URL", self.cover_image_url.as_deref())
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
            .set("category_id", self.category_id)
            .set("location", trimmed(&self.location))
            .set("year", self.year)
            .set_some("status", self.status.clone())
            .set("cover_image_url", trimmed(&self.cover_image_url))
            .set("gallery", self.gallery.clone().unwrap_or_default())
            .set_some("is_featured", self.is_featured)
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}

impl RecordPatch for UpdateProject {
    fn validate(&self) -> Result<(), CoreError> {
        not_blank("Title", self.title.as_deref())?;
        if let Some(slug) = &self.slug {
            validate_slug(slug)?;
        }
        if let Some(status) = &self.status {
            validate_one_of("status", status, PROJECT_STATUSES)?;
        }
        validate_year(self.year)?;
        validate_optional_url("Cover image URL", self.cover_image_url.as_deref())
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
            .set_some("category_id", self.category_id)
            .set_some("location", self.location.clone())
            .set_some("year", self.year)
            .set_some("status", self.status.clone())
            .set_some("cover_image_url", self.cover_image_url.clone())
            .set_some("gallery", self.gallery.clone())
            .set_some("is_featured", self.is_featured)
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn input(title: &str) -> CreateProject {
        let mut input = CreateProject {
            title: Some(title.into()),
            ..Default::default()
        };
        input.prepare();
        input
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut p = input("Harbour Pavilion");
        p.status = Some("abandoned".into());
        assert_matches!(p.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn year_out_of_range_is_rejected() {
        let mut p = input("Harbour Pavilion");
        p.year = Some(99);
        assert_matches!(
            p.validate(),
            Err(CoreError::Validation(msg)) if msg.starts_with("Year must be between")
        );
    }

    #[test]
    fn title_without_slug_characters_fails_slug_validation() {
        let p = input("———");
        assert_matches!(
            p.validate(),
            Err(CoreError::Validation(msg)) if msg == "Slug must not be empty"
        );
    }

    #[test]
    fn create_changeset_writes_empty_gallery() {
        let cs = input("Harbour Pavilion").changeset();
        assert_eq!(
            cs.get("gallery"),
            Some(&crate::collection::FieldValue::TextArray(Vec::new()))
        );
        assert!(cs.get("status").is_none());
    }

    #[test]
    fn detail_flattens_project_fields() {
        let now = chrono::Utc::now();
        let detail = ProjectDetail {
            project: Project {
                id: 1,
                title: "Harbour Pavilion".into(),
                slug: "harbour-pavilion".into(),
                summary: None,
                description: None,
                category_id: None,
                location: None,
                year: Some(2021),
                status: "completed".into(),
                cover_image_url: None,
                gallery: vec![],
                is_featured: false,
                is_published: true,
                sort_order: 0,
                created_at: now,
                updated_at: now,
            },
            category: None,
            partners: vec![],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["slug"], "harbour-pavilion");
        assert!(json["category"].is_null());
        assert_eq!(json["partners"], serde_json::json!([]));
    }
}
