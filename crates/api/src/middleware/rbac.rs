//! Role-based access control extractor.
//!
//! Roles live in `profiles.role`, not in the token, so the check costs one
//! lookup against the service pool.

use archsite_core::error::CoreError;
use archsite_db::models::profile::Profile;
use archsite_db::repositories::ProfileRepo;
use archsite_db::retry::retry_query;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user, _profile): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser, pub Profile);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let pool = state.service_db()?;

        let profile = retry_query(&state.config.retry, || {
            ProfileRepo::find_by_id(pool, user.user_id)
        })
        .await?;

        match profile {
            Some(profile) if profile.is_admin() => Ok(RequireAdmin(user, profile)),
            _ => {
                tracing::warn!(user_id = %user.user_id, "Non-admin attempted admin access");
                Err(AppError::Core(CoreError::Forbidden(
                    "Admin role required".into(),
                )))
            }
        }
    }
}
