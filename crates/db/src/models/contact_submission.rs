//! Contact form submissions.
//!
//! Created from the public site, triaged from the admin inbox. There is no
//! slug and no publish flag.

use archsite_core::error::CoreError;
use archsite_core::types::{DbId, Timestamp};
use archsite_core::validation::{
    require, validate_email, validate_max_len, validate_one_of, CONTACT_STATUSES,
    CONTACT_STATUS_NEW, MAX_BODY_LEN, MAX_LINE_LEN,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::collection::{
    trimmed, Changeset, Collection, CollectionSpec, Editable, FilterField, NewRecord, RecordPatch,
    NEWEST_FIRST,
};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactSubmission {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /public/contact`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// Admins only move a submission through its triage states.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContactSubmission {
    pub status: Option<String>,
}

impl Collection for ContactSubmission {
    const SPEC: CollectionSpec = CollectionSpec::new(
        "contact_submissions",
        "Contact submission",
        "contact submission",
        "id, name, email, phone, company, subject, message, status, created_at, updated_at",
    )
    .searchable(&["name", "email", "company", "subject"])
    .filters(&[FilterField::text("status", "status")])
    .sortable(&["name", "email", "status", "created_at"])
    .ordered_by(NEWEST_FIRST)
    .default_limit(20);
}

impl Editable for ContactSubmission {
    type Create = CreateContactSubmission;
    type Update = UpdateContactSubmission;

    fn id(&self) -> DbId {
        self.id
    }
}

impl NewRecord for CreateContactSubmission {
    fn prepare(&mut self) {
        self.name = trimmed(&self.name);
        self.email = trimmed(&self.email);
        self.message = trimmed(&self.message);
    }

    fn validate(&self) -> Result<(), CoreError> {
        let name = require("Name", self.name.as_deref())?;
        let email = require("Email", self.email.as_deref())?;
        let message = require("Message", self.message.as_deref())?;
        validate_max_len("Name", name, MAX_LINE_LEN)?;
        validate_email(email)?;
        if let Some(subject) = &self.subject {
            validate_max_len("Subject", subject, MAX_LINE_LEN)?;
        }
        validate_max_len("Message", message, MAX_BODY_LEN)
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set("name", self.name.clone())
            .set("email", self.email.clone())
            .set("phone", trimmed(&self.phone))
            .set("company", trimmed(&self.company))
            .set("subject", trimmed(&self.subject))
            .set("message", self.message.clone())
            .set("status", CONTACT_STATUS_NEW)
    }
}

impl RecordPatch for UpdateContactSubmission {
    fn validate(&self) -> Result<(), CoreError> {
        match &self.status {
            Some(status) => validate_one_of("status", status, CONTACT_STATUSES),
            None => Ok(()),
        }
    }

    fn changeset(&self) -> Changeset {
        Changeset::new().set_some("status", self.status.clone())
    }
}
