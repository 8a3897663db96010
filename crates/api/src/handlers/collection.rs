//! Generic handlers shared by every content collection.
//!
//! Routes mount these with the row type as a parameter, e.g.
//! `get(collection::admin_list::<Partner>)`. Entity-specific behaviour
//! lives in the collection's `SPEC` and its create/update DTOs.

use std::collections::HashMap;

use archsite_core::error::CoreError;
use archsite_core::types::{DbId, UserId};
use archsite_db::collection::{Collection, Editable, NewRecord, RecordPatch};
use archsite_db::list_query::{ListQuery, Page};
use archsite_db::models::activity_log::{NewActivity, ACTION_CREATE, ACTION_DELETE, ACTION_UPDATE};
use archsite_db::repositories::{ActivityLogRepo, CollectionRepo};
use archsite_db::retry::retry_query;
use archsite_db::DbPool;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::config::ErrorPolicy;
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{Audience, ListParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/{collection}
pub async fn admin_list<C: Collection>(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(raw): Query<HashMap<String, String>>,
) -> AppResult<Json<Page<C>>> {
    let pool = state.service_db()?;
    let query = ListParams::from_map(raw).into_query(C::SPEC, Audience::Admin);
    let page = fetch_page::<C>(&state, pool, &query, state.config.admin_list_policy).await?;
    Ok(Json(page))
}

/// GET /api/v1/admin/{collection}/{id}
pub async fn admin_get<C: Collection>(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<C>>> {
    let pool = state.service_db()?;
    let record = find_or_404::<C>(&state, pool, id).await?;
    Ok(Json(DataResponse::new(record)))
}

/// POST /api/v1/admin/{collection}
pub async fn admin_create<C: Editable>(
    State(state): State<AppState>,
    RequireAdmin(user, _): RequireAdmin,
    Json(input): Json<C::Create>,
) -> AppResult<(StatusCode, Json<DataResponse<C>>)> {
    let pool = state.service_db()?;
    let record = create_record::<C>(&state, pool, input).await?;
    log_activity::<C>(pool, Some(user.user_id), ACTION_CREATE, record.id()).await;
    Ok((StatusCode::CREATED, Json(DataResponse::new(record))))
}

/// PUT /api/v1/admin/{collection}/{id}
///
/// Partial update: only fields present in the body change.
pub async fn admin_update<C: Editable>(
    State(state): State<AppState>,
    RequireAdmin(user, _): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<C::Update>,
) -> AppResult<Json<DataResponse<C>>> {
    let pool = state.service_db()?;
    let spec = C::SPEC;

    input.prepare();
    input.validate()?;
    let changeset = input.changeset();
    if changeset.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    // A missing row is a 404 even when the requested slug is taken.
    find_or_404::<C>(&state, pool, id).await?;

    if let Some(slug) = input.slug() {
        let taken = retry_query(&state.config.retry, || {
            CollectionRepo::slug_exists(pool, &spec, slug, Some(id))
        })
        .await?;
        if taken {
            return Err(AppError::Core(CoreError::Conflict(spec.slug_conflict_message())));
        }
    }

    let record = retry_query(&state.config.retry, || {
        CollectionRepo::update::<C>(pool, id, &changeset)
    })
    .await
    .map_err(slug_race_to_conflict::<C>)?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: spec.entity,
        id,
    }))?;

    tracing::info!(table = spec.table, id, "Record updated");
    log_activity::<C>(pool, Some(user.user_id), ACTION_UPDATE, id).await;
    Ok(Json(DataResponse::new(record)))
}

/// DELETE /api/v1/admin/{collection}/{id}
///
/// Dependent rows go in the same transaction as the parent.
pub async fn admin_delete<C: Editable>(
    State(state): State<AppState>,
    RequireAdmin(user, _): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let pool = state.service_db()?;
    let spec = C::SPEC;

    let deleted = retry_query(&state.config.retry, || CollectionRepo::delete::<C>(pool, id)).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: spec.entity,
            id,
        }));
    }

    tracing::info!(table = spec.table, id, "Record deleted");
    log_activity::<C>(pool, Some(user.user_id), ACTION_DELETE, id).await;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/public/{collection}
pub async fn public_list<C: Collection>(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> AppResult<Json<Page<C>>> {
    let pool = state.public_db()?;
    let query = ListParams::from_map(raw).into_query(C::SPEC, Audience::Public);
    let page = fetch_page::<C>(&state, pool, &query, state.config.public_list_policy).await?;
    Ok(Json(page))
}

/// GET /api/v1/public/{collection}/{slug}
///
/// Unpublished rows are indistinguishable from missing ones.
pub async fn public_get<C: Collection>(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<C>>> {
    let pool = state.public_db()?;
    let record = retry_query(&state.config.retry, || {
        CollectionRepo::find_by_slug::<C>(pool, &slug, true)
    })
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::NotFoundBySlug {
            entity: C::SPEC.entity,
            slug: slug.clone(),
        })
    })?;
    Ok(Json(DataResponse::new(record)))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Run a list query under the retry policy, then apply the endpoint's
/// error policy to whatever failure is left.
pub async fn fetch_page<C: Collection>(
    state: &AppState,
    pool: &DbPool,
    query: &ListQuery,
    policy: ErrorPolicy,
) -> AppResult<Page<C>> {
    match retry_query(&state.config.retry, || CollectionRepo::list::<C>(pool, query)).await {
        Ok(page) => Ok(page),
        Err(e) => match policy {
            ErrorPolicy::Surface => Err(e.into()),
            ErrorPolicy::Degrade => {
                tracing::warn!(
                    table = C::SPEC.table,
                    error = %e,
                    "List query failed, returning an empty page"
                );
                Ok(Page::empty(query.page_request()))
            }
        },
    }
}

pub async fn find_or_404<C: Collection>(state: &AppState, pool: &DbPool, id: DbId) -> AppResult<C> {
    retry_query(&state.config.retry, || CollectionRepo::find_by_id::<C>(pool, id))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: C::SPEC.entity,
            id,
        }))
}

/// Normalise, validate, check the slug and insert.
pub async fn create_record<C: Editable>(
    state: &AppState,
    pool: &DbPool,
    mut input: C::Create,
) -> AppResult<C> {
    let spec = C::SPEC;

    input.prepare();
    input.validate()?;

    if let Some(slug) = input.slug() {
        let taken = retry_query(&state.config.retry, || {
            CollectionRepo::slug_exists(pool, &spec, slug, None)
        })
        .await?;
        if taken {
            return Err(AppError::Core(CoreError::Conflict(spec.slug_conflict_message())));
        }
    }

    let changeset = input.changeset();
    let record = retry_query(&state.config.retry, || {
        CollectionRepo::insert::<C>(pool, &changeset)
    })
    .await
    .map_err(slug_race_to_conflict::<C>)?;

    tracing::info!(table = spec.table, id = record.id(), "Record created");
    Ok(record)
}

/// A unique violation that slipped past the pre-check (a concurrent write
/// took the slug) reads the same as one the pre-check caught.
fn slug_race_to_conflict<C: Collection>(err: sqlx::Error) -> AppError {
    if C::SPEC.slug_column.is_some() && is_unique_violation(&err) {
        return AppError::Core(CoreError::Conflict(C::SPEC.slug_conflict_message()));
    }
    err.into()
}

/// Append a best-effort activity-log row for an admin mutation.
pub async fn log_activity<C: Collection>(
    pool: &DbPool,
    actor_id: Option<UserId>,
    action: &'static str,
    entity_id: DbId,
) {
    ActivityLogRepo::record(
        pool,
        NewActivity {
            actor_id,
            action,
            entity_type: C::SPEC.table,
            entity_id: Some(entity_id),
            details: json!({ "entity": C::SPEC.entity }),
        },
    )
    .await;
}
