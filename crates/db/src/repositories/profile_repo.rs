//! Repository for the `profiles` table.

use archsite_core::types::UserId;
use sqlx::PgPool;

use crate::models::profile::Profile;

const COLUMNS: &str = "id, email, full_name, role, created_at, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    /// Find the profile for an auth-provider user id.
    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
