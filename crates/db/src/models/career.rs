//! Career (job opening) model and DTOs.

use archsite_core::error::CoreError;
use archsite_core::slug::{generate_slug, validate_slug};
use archsite_core::types::{DbId, Timestamp};
use archsite_core::validation::{
    not_blank, require, validate_email, validate_max_len, validate_one_of, EMPLOYMENT_TYPES,
    MAX_LINE_LEN,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::collection::{
    trimmed, Changeset, Collection, CollectionSpec, Editable, FilterField, NewRecord, RecordPatch,
    CONTENT_ORDER,
};

/// A row from the `careers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Career {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub requirements: Vec<String>,
    pub application_email: Option<String>,
    pub closes_at: Option<Timestamp>,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCareer {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    /// Defaults to `full_time` in the database.
    pub employment_type: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub application_email: Option<String>,
    pub closes_at: Option<Timestamp>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCareer {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub application_email: Option<String>,
    pub closes_at: Option<Timestamp>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

impl Collection for Career {
    const SPEC: CollectionSpec = CollectionSpec::new(
        "careers",
        "Career",
        "career",
        "id, title, slug, department, location, employment_type, summary, description, \
         requirements, application_email, closes_at, is_published, sort_order, created_at, \
         updated_at",
    )
    .searchable(&["title", "summary", "location"])
    .filters(&[
        FilterField::text("department", "department"),
        FilterField::text("employment_type", "employment_type"),
        FilterField::text("location", "location"),
        FilterField::boolean("is_published", "is_published"),
    ])
    .sortable(&["title", "department", "closes_at", "sort_order", "created_at"])
    .ordered_by(CONTENT_ORDER)
    .default_limit(20)
    .published("is_published")
    .slugged("slug");
}

impl Editable for Career {
    type Create = CreateCareer;
    type Update = UpdateCareer;

    fn id(&self) -> DbId {
        self.id
    }
}

fn validate_posting(employment_type: Option<&str>, email: Option<&str>) -> Result<(), CoreError> {
    if let Some(kind) = employment_type {
        validate_one_of("employment type", kind, EMPLOYMENT_TYPES)?;
    }
    match email {
        Some(email) => validate_email(email),
        None => Ok(()),
    }
}

impl NewRecord for CreateCareer {
    fn prepare(&mut self) {
        self.title = trimmed(&self.title);
        self.application_email = trimmed(&self.application_email);
        self.slug = trimmed(&self.slug).or_else(|| self.title.as_deref().map(generate_slug));
    }

    fn validate(&self) -> Result<(), CoreError> {
        let title = require("Title", self.title.as_deref())?;
        validate_max_len("Title", title, MAX_LINE_LEN)?;
        validate_slug(self.slug.as_deref().unwrap_or_default())?;
        validate_posting(
            self.employment_type.as_deref(),
            self.application_email.as_deref(),
        )
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set("title", self.title.clone())
            .set("slug", self.slug.clone())
            .set("department", trimmed(&self.department))
            .set("location", trimmed(&self.location))
            .set_some("employment_type", self.employment_type.clone())
            .set("summary", self.summary.clone())
            .set("description", self.description.clone())
            .set("requirements", self.requirements.clone().unwrap_or_default())
            .set("application_email", self.application_email.clone())
            .set("closes_at", self.closes_at)
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}

impl RecordPatch for UpdateCareer {
    fn validate(&self) -> Result<(), CoreError> {
        not_blank("Title", self.title.as_deref())?;
        if let Some(slug) = &self.slug {
            validate_slug(slug)?;
        }
        validate_posting(
            self.employment_type.as_deref(),
            self.application_email.as_deref(),
        )
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set_some("title", self.title.clone())
            .set_some("slug", self.slug.clone())
            .set_some("department", self.department.clone())
            .set_some("location", self.location.clone())
            .set_some("employment_type", self.employment_type.clone())
            .set_some("summary", self.summary.clone())
            .set_some("description", self.description.clone())
            .set_some("requirements", self.requirements.clone())
            .set_some("application_email", self.application_email.clone())
            .set_some("closes_at", self.closes_at)
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn employment_type_must_be_known() {
        let mut c = CreateCareer {
            title: Some("Project Architect".into()),
            employment_type: Some("gig".into()),
            ..Default::default()
        };
        c.prepare();
        assert_matches!(c.validate(), Err(CoreError::Validation(_)));

        c.employment_type = Some("contract".into());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_update_has_empty_changeset() {
        assert!(UpdateCareer::default().changeset().is_empty());
    }
}
