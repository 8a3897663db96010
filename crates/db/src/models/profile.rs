//! Profiles mirror auth-provider users and carry the role flag.

use archsite_core::roles::ROLE_ADMIN;
use archsite_core::types::{Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[cfg(test)]
mod tests {
    use archsite_core::roles::ROLE_USER;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn profile(role: &str) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: Some("studio@example.com".into()),
            full_name: None,
            role: role.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn only_admin_role_is_admin() {
        assert!(profile(ROLE_ADMIN).is_admin());
        assert!(!profile(ROLE_USER).is_admin());
        assert!(!profile("Admin").is_admin());
    }
}
