//! Team member model and DTOs.

use archsite_core::error::CoreError;
use archsite_core::slug::{generate_slug, validate_slug};
use archsite_core::types::{DbId, Timestamp};
use archsite_core::validation::{
    not_blank, require, validate_email, validate_max_len, validate_optional_url, MAX_LINE_LEN,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::collection::{
    trimmed, Changeset, Collection, CollectionSpec, Dependent, Editable, FilterField, NewRecord,
    RecordPatch, CONTENT_ORDER,
};

/// A row from the `team_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamMember {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTeamMember {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeamMember {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

impl Collection for TeamMember {
    const SPEC: CollectionSpec = CollectionSpec::new(
        "team_members",
        "Team member",
        "team member",
        "id, name, slug, position, department, bio, photo_url, email, linkedin_url, \
         is_published, sort_order, created_at, updated_at",
    )
    .searchable(&["name", "position", "bio"])
    .filters(&[
        FilterField::text("department", "department"),
        FilterField::boolean("is_published", "is_published"),
    ])
    .sortable(&["name", "department", "sort_order", "created_at"])
    .ordered_by(CONTENT_ORDER)
    .default_limit(50)
    .published("is_published")
    .slugged("slug");
}

impl Editable for TeamMember {
    type Create = CreateTeamMember;
    type Update = UpdateTeamMember;

    /// Authored articles stay published without a byline.
    const DEPENDENTS: &'static [Dependent] =
        &[Dependent::nullify("explore_content", "author_id")];

    fn id(&self) -> DbId {
        self.id
    }
}

fn validate_contact(email: Option<&str>, photo: Option<&str>, linkedin: Option<&str>) -> Result<(), CoreError> {
    if let Some(email) = email {
        validate_email(email)?;
    }
    validate_optional_url("Photo URL", photo)?;
    validate_optional_url("LinkedIn URL", linkedin)
}

impl NewRecord for CreateTeamMember {
    fn prepare(&mut self) {
        self.name = trimmed(&self.name);
        self.email = trimmed(&self.email);
        self.slug = trimmed(&self.slug).or_else(|| self.name.as_deref().map(generate_slug));
    }

    fn validate(&self) -> Result<(), CoreError> {
        let name = require("Name", self.name.as_deref())?;
        validate_max_len("Name", name, MAX_LINE_LEN)?;
        validate_slug(self.slug.as_deref().unwrap_or_default())?;
        validate_contact(
            self.email.as_deref(),
            self.photo_url.as_deref(),
            self.linkedin_url.as_deref(),
        )
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set("name", self.name.clone())
            .set("slug", self.slug.clone())
            .set("position", trimmed(&self.position))
            .set("department", trimmed(&self.department))
            .set("bio", self.bio.clone())
            .set("photo_url", trimmed(&self.photo_url))
            .set("email", self.email.clone())
            .set("linkedin_url", trimmed(&self.linkedin_url))
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}

impl RecordPatch for UpdateTeamMember {
    fn validate(&self) -> Result<(), CoreError> {
        not_blank("Name", self.name.as_deref())?;
        if let Some(slug) = &self.slug {
            validate_slug(slug)?;
        }
        validate_contact(
            self.email.as_deref(),
            self.photo_url.as_deref(),
            self.linkedin_url.as_deref(),
        )
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set_some("name", self.name.clone())
            .set_some("slug", self.slug.clone())
            .set_some("position", self.position.clone())
            .set_some("department", self.department.clone())
            .set_some("bio", self.bio.clone())
            .set_some("photo_url", self.photo_url.clone())
            .set_some("email", self.email.clone())
            .set_some("linkedin_url", self.linkedin_url.clone())
            .set_some("is_published", self.is_published)
            .set_some("sort_order", self.sort_order)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn invalid_email_is_rejected() {
        let mut m = CreateTeamMember {
            name: Some("Ines Moreau".into()),
            email: Some("ines at studio".into()),
            ..Default::default()
        };
        m.prepare();
        assert_matches!(m.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_email_is_treated_as_absent() {
        let mut m = CreateTeamMember {
            name: Some("Ines Moreau".into()),
            email: Some("  ".into()),
            ..Default::default()
        };
        m.prepare();
        assert!(m.validate().is_ok());
        assert_eq!(m.slug(), Some("ines-moreau"));
    }

    #[test]
    fn deleting_a_member_orphans_their_articles() {
        assert_eq!(
            TeamMember::DEPENDENTS[0].cleanup_sql(),
            "UPDATE explore_content SET author_id = NULL WHERE author_id = $1"
        );
    }
}
