//! Partner (collaborating firms, consultants, clients) model and DTOs.

use archsite_core::error::CoreError;
use archsite_core::slug::{generate_slug, validate_slug};
use archsite_core::types::{DbId, Timestamp};
use archsite_core::validation::{
    not_blank, require, validate_max_len, validate_optional_url, MAX_LINE_LEN,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::collection::{
    trimmed, Changeset, Collection, CollectionSpec, Dependent, Editable, FilterField, NewRecord,
    RecordPatch, CONTENT_ORDER,
};

/// A row from the `partners` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Partner {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub partner_type: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a partner. `slug` is derived from `name` when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePartner {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub partner_type: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

/// DTO for updating a partner. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePartner {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub partner_type: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

impl Collection for Partner {
    const SPEC: CollectionSpec = CollectionSpec::new(
        "partners",
        "Partner",
        "partner",
        "id, name, slug, partner_type, description, logo_url, website_url, \
         is_published, sort_order, created_at, updated_at",
    )
    .searchable(&["name", "description"])
    .filters(&[
        FilterField::text("type", "partner_type"),
        FilterField::boolean("is_published", "is_published"),
    ])
    .sortable(&["name", "sort_order", "created_at"])
    .ordered_by(CONTENT_ORDER)
    .default_limit(50)
    .published("is_published")
    .slugged("slug");
}

impl Editable for Partner {
    type Create = CreatePartner;
    type Update = UpdatePartner;

    const DEPENDENTS: &'static [Dependent] = &[Dependent::delete("project_partners", "partner_id")];

    fn id(&self) -> DbId {
        self.id
    }
}

impl NewRecord for CreatePartner {
    fn prepare(&mut self) {
        self.name = trimmed(&self.name);
        self.slug = trimmed(&self.slug).or_else(|| self.name.as_deref().map(generate_slug));
    }

    fn validate(&self) -> Result<(), CoreError> {
        let name = require("Name", self.name.as_deref())?;
        validate_max_len("Name", name, MAX_LINE_LEN)?;
        validate_slug(self.slug.as_deref().unwrap_or_default())?;
        validate_optional_url("Website URL", self.website_url.as_deref())?;
        Ok(())
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set("name", self.name.clone())
            .set("slug", self.slug.clone())
            .set("partner_type", trimmed(&self.partner_type))
            .set("description", self.description.clone())
            .set("logo_url", trimmed(&self.logo_url))
            .set("website_url", trimmed(&self.website_url))
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}

impl RecordPatch for UpdatePartner {
    fn validate(&self) -> Result<(), CoreError> {
        not_blank("Name", self.name.as_deref())?;
        if let Some(name) = &self.name {
            validate_max_len("Name", name, MAX_LINE_LEN)?;
        }
        if let Some(slug) = &self.slug {
            validate_slug(slug)?;
        }
        validate_optional_url("Website URL", self.website_url.as_deref())?;
        Ok(())
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set_some("name", self.name.clone())
            .set_some("slug", self.slug.clone())
            .set_some("partner_type", self.partner_type.clone())
            .set_some("description", self.description.clone())
            .set_some("logo_url", self.logo_url.clone())
            .set_some("website_url", self.website_url.clone())
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}

#[cfg(test)]
mod tests {
    use archsite_core::slug::MAX_SLUG_LEN;
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn prepare_derives_slug_from_name() {
        let mut input = CreatePartner {
            name: Some("  Acme Structural  ".into()),
            ..Default::default()
        };
        input.prepare();
        assert_eq!(input.name.as_deref(), Some("Acme Structural"));
        assert_eq!(input.slug(), Some("acme-structural"));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn long_name_without_slug_still_validates() {
        let mut input = CreatePartner {
            name: Some("a".repeat(250)),
            ..Default::default()
        };
        input.prepare();
        assert_eq!(input.slug().map(str::len), Some(MAX_SLUG_LEN));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn explicit_slug_wins() {
        let mut input = CreatePartner {
            name: Some("Acme".into()),
            slug: Some("acme".into()),
            ..Default::default()
        };
        input.prepare();
        assert_eq!(input.slug(), Some("acme"));
    }

    #[test]
    fn missing_name_is_rejected() {
        let mut input = CreatePartner::default();
        input.prepare();
        assert_matches!(
            input.validate(),
            Err(CoreError::Validation(msg)) if msg == "Name is required"
        );
    }

    #[test]
    fn create_changeset_leaves_defaults_to_the_database() {
        let mut input = CreatePartner {
            name: Some("Acme".into()),
            ..Default::default()
        };
        input.prepare();
        let cs = input.changeset();
        assert!(cs.get("is_published").is_none());
        assert!(cs.get("sort_order").is_none());
        assert!(cs.get("slug").is_some());
    }

    #[test]
    fn empty_patch_has_no_changes() {
        assert!(UpdatePartner::default().changeset().is_empty());
    }

    #[test]
    fn patch_rejects_blank_name() {
        let patch = UpdatePartner {
            name: Some(" ".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
