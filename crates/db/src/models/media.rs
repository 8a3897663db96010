//! Media library entries.
//!
//! Files are uploaded to object storage by the client; a media row records
//! the resulting URL and its metadata.

use archsite_core::error::CoreError;
use archsite_core::types::{DbId, Timestamp, UserId};
use archsite_core::validation::{
    not_blank, require, validate_max_len, validate_url, MAX_LINE_LEN,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::collection::{
    trimmed, Changeset, Collection, CollectionSpec, Editable, FilterField, NewRecord, RecordPatch,
    NEWEST_FIRST,
};

/// Folder used when the caller does not pick one.
pub const DEFAULT_FOLDER: &str = "general";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    pub file_name: String,
    pub url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub alt_text: Option<String>,
    pub folder: String,
    pub uploaded_by: Option<UserId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMedia {
    pub file_name: Option<String>,
    pub url: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub alt_text: Option<String>,
    pub folder: Option<String>,
    /// Filled in by the handler from the authenticated user.
    #[serde(skip)]
    pub uploaded_by: Option<UserId>,
}

/// Only descriptive metadata can change after upload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMedia {
    pub file_name: Option<String>,
    pub alt_text: Option<String>,
    pub folder: Option<String>,
}

/// Aggregate numbers for `GET /admin/media/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaStats {
    pub total_files: i64,
    pub total_bytes: i64,
    /// Counts keyed by MIME major type (`image`, `video`, ...; `other` when unknown).
    pub by_type: std::collections::BTreeMap<String, i64>,
}

impl Collection for Media {
    const SPEC: CollectionSpec = CollectionSpec::new(
        "media",
        "Media",
        "media item",
        "id, file_name, url, mime_type, size_bytes, alt_text, folder, uploaded_by, created_at, \
         updated_at",
    )
    .searchable(&["file_name", "alt_text"])
    .filters(&[
        FilterField::text("folder", "folder"),
        FilterField::text("mime_type", "mime_type"),
    ])
    .sortable(&["file_name", "size_bytes", "created_at"])
    .ordered_by(NEWEST_FIRST)
    .default_limit(50);
}

impl Editable for Media {
    type Create = CreateMedia;
    type Update = UpdateMedia;

    fn id(&self) -> DbId {
        self.id
    }
}

impl NewRecord for CreateMedia {
    fn prepare(&mut self) {
        self.file_name = trimmed(&self.file_name);
        self.url = trimmed(&self.url);
        self.folder = trimmed(&self.folder).or_else(|| Some(DEFAULT_FOLDER.to_owned()));
    }

    fn validate(&self) -> Result<(), CoreError> {
        let file_name = require("File name", self.file_name.as_deref())?;
        validate_max_len("File name", file_name, MAX_LINE_LEN)?;
        validate_url("URL", require("URL", self.url.as_deref())?)?;
        if matches!(self.size_bytes, Some(n) if n < 0) {
            return Err(CoreError::Validation("Size must not be negative".into()));
        }
        Ok(())
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set("file_name", self.file_name.clone())
            .set("url", self.url.clone())
            .set("mime_type", trimmed(&self.mime_type))
            .set("size_bytes", self.size_bytes)
            .set("alt_text", self.alt_text.clone())
            .set("folder", self.folder.clone())
            .set("uploaded_by", self.uploaded_by)
    }
}

impl RecordPatch for UpdateMedia {
    fn validate(&self) -> Result<(), CoreError> {
        not_blank("File name", self.file_name.as_deref())?;
        not_blank("Folder", self.folder.as_deref())
    }

    fn changeset(&self) -> Changeset {
        Changeset::new()
            .set_some("file_name", self.file_name.clone())
            .set_some("alt_text", self.alt_text.clone())
            .set_some("folder", self.folder.clone())
    }
}

/// Major part of a MIME type, e.g. `image` for `image/png`.
pub fn mime_major(mime: Option<&str>) -> &str {
    mime.and_then(|m| m.split('/').next())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or("other")
}
