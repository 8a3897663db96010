//! Repository for the `activity_log` table.

use sqlx::PgPool;

use crate::models::activity_log::NewActivity;

/// Append-only writes to the audit trail.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Insert an entry. Fallible; see [`ActivityLogRepo::record`].
    pub async fn insert(pool: &PgPool, entry: &NewActivity) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO activity_log (actor_id, action, entity_type, entity_id, details) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(entry.actor_id)
        .bind(entry.action)
        .bind(entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.details)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Best-effort insert: a failure is logged and swallowed so the
    /// mutation that triggered it still succeeds.
    pub async fn record(pool: &PgPool, entry: NewActivity) {
        if let Err(e) = Self::insert(pool, &entry).await {
            tracing::warn!(
                error = %e,
                action = entry.action,
                entity_type = entry.entity_type,
                entity_id = ?entry.entity_id,
                "Failed to record activity"
            );
        }
    }
}
