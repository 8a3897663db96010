//! Media library handlers that differ from the generic collection ones.

use archsite_db::models::activity_log::ACTION_CREATE;
use archsite_db::models::media::{CreateMedia, Media, MediaStats};
use archsite_db::repositories::MediaRepo;
use archsite_db::retry::retry_query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppResult;
use crate::handlers::collection::{create_record, log_activity};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/media
///
/// Registers an already-uploaded file, recording the caller as uploader.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(user, _): RequireAdmin,
    Json(mut input): Json<CreateMedia>,
) -> AppResult<(StatusCode, Json<DataResponse<Media>>)> {
    let pool = state.service_db()?;
    input.uploaded_by = Some(user.user_id);
    let media = create_record::<Media>(&state, pool, input).await?;
    log_activity::<Media>(pool, Some(user.user_id), ACTION_CREATE, media.id).await;
    Ok((StatusCode::CREATED, Json(DataResponse::new(media))))
}

/// GET /api/v1/admin/media/stats
pub async fn stats(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<DataResponse<MediaStats>>> {
    let pool = state.service_db()?;
    let stats = retry_query(&state.config.retry, || MediaRepo::stats(pool)).await?;
    Ok(Json(DataResponse::new(stats)))
}
