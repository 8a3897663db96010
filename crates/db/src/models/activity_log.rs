//! Append-only audit trail of admin mutations.

use archsite_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

use crate::collection::{Collection, CollectionSpec, FilterField, NEWEST_FIRST};

pub const ACTION_CREATE: &str = "create";
pub const ACTION_UPDATE: &str = "update";
pub const ACTION_DELETE: &str = "delete";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    pub actor_id: Option<UserId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

/// A new entry, built by handlers after a successful mutation.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub actor_id: Option<UserId>,
    pub action: &'static str,
    pub entity_type: &'static str,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
}

impl Collection for ActivityLog {
    const SPEC: CollectionSpec = CollectionSpec::new(
        "activity_log",
        "Activity entry",
        "activity entry",
        "id, actor_id, action, entity_type, entity_id, details, created_at",
    )
    .filters(&[
        FilterField::text("entity_type", "entity_type"),
        FilterField::text("action", "action"),
    ])
    .sortable(&["created_at"])
    .ordered_by(NEWEST_FIRST)
    .default_limit(50);
}
