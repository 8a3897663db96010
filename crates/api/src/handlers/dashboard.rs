//! Admin overview handlers.

use archsite_db::models::profile::Profile;
use archsite_db::repositories::{DashboardCounts, DashboardRepo};
use archsite_db::retry::retry_query;
use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<DataResponse<DashboardCounts>>> {
    let pool = state.service_db()?;
    let counts = retry_query(&state.config.retry, || DashboardRepo::counts(pool)).await?;
    Ok(Json(DataResponse::new(counts)))
}

/// GET /api/v1/admin/me
pub async fn me(RequireAdmin(_, profile): RequireAdmin) -> Json<DataResponse<Profile>> {
    Json(DataResponse::new(profile))
}
