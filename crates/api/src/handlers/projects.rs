//! Project handlers beyond plain CRUD: the public detail view and the
//! admin partner links.

use archsite_core::error::CoreError;
use archsite_core::types::DbId;
use archsite_db::models::activity_log::ACTION_UPDATE;
use archsite_db::models::partner::Partner;
use archsite_db::models::project::{Project, ProjectDetail, SetProjectPartners};
use archsite_db::repositories::ProjectRepo;
use archsite_db::retry::retry_query;
use axum::extract::{Path, State};
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::handlers::collection::{find_or_404, log_activity};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/public/projects/{slug}
///
/// The project with its category and published partners.
pub async fn public_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let pool = state.public_db()?;
    let detail = retry_query(&state.config.retry, || ProjectRepo::detail(pool, &slug, true))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundBySlug {
                entity: "Project",
                slug: slug.clone(),
            })
        })?;
    Ok(Json(DataResponse::new(detail)))
}

/// GET /api/v1/admin/projects/{id}/partners
pub async fn list_partners(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Partner>>>> {
    let pool = state.service_db()?;
    find_or_404::<Project>(&state, pool, id).await?;
    let partners =
        retry_query(&state.config.retry, || ProjectRepo::partners_for(pool, id, false)).await?;
    Ok(Json(DataResponse::new(partners)))
}

/// PUT /api/v1/admin/projects/{id}/partners
///
/// Replaces the whole partner set; an unknown partner id fails the request
/// and leaves the old set in place.
pub async fn set_partners(
    State(state): State<AppState>,
    RequireAdmin(user, _): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<SetProjectPartners>,
) -> AppResult<Json<DataResponse<Vec<Partner>>>> {
    let pool = state.service_db()?;
    find_or_404::<Project>(&state, pool, id).await?;

    retry_query(&state.config.retry, || {
        ProjectRepo::replace_partners(pool, id, &input.partner_ids)
    })
    .await?;
    tracing::info!(project_id = id, count = input.partner_ids.len(), "Project partners replaced");
    log_activity::<Project>(pool, Some(user.user_id), ACTION_UPDATE, id).await;

    let partners =
        retry_query(&state.config.retry, || ProjectRepo::partners_for(pool, id, false)).await?;
    Ok(Json(DataResponse::new(partners)))
}
