//! Newsletter subscription handlers.

use archsite_core::error::CoreError;
use archsite_core::types::DbId;
use archsite_db::models::activity_log::ACTION_DELETE;
use archsite_db::models::newsletter_subscriber::{
    normalize_email, NewsletterSubscriber, SubscribeRequest, UnsubscribeRequest,
};
use archsite_db::repositories::{NewsletterRepo, SubscribeOutcome};
use archsite_db::retry::retry_query;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::handlers::collection::log_activity;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const ALREADY_SUBSCRIBED: &str = "This email is already subscribed";

/// POST /api/v1/public/newsletter
///
/// 201 for a new address, 200 when an unsubscribed address comes back, 409
/// when it is already subscribed.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(input): Json<SubscribeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<NewsletterSubscriber>>)> {
    let email = normalize_email(input.email.as_deref())?;
    let name = input.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let pool = state.public_db()?;

    let outcome = retry_query(&state.config.retry, || {
        NewsletterRepo::subscribe(pool, &email, name)
    })
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Core(CoreError::Conflict(ALREADY_SUBSCRIBED.into()))
        } else {
            e.into()
        }
    })?;

    match outcome {
        SubscribeOutcome::Created(subscriber) => {
            tracing::info!(subscriber_id = subscriber.id, "Newsletter subscription created");
            Ok((StatusCode::CREATED, Json(DataResponse::new(subscriber))))
        }
        SubscribeOutcome::Resubscribed(subscriber) => {
            tracing::info!(subscriber_id = subscriber.id, "Newsletter subscription renewed");
            Ok((StatusCode::OK, Json(DataResponse::new(subscriber))))
        }
        SubscribeOutcome::AlreadySubscribed => {
            Err(AppError::Core(CoreError::Conflict(ALREADY_SUBSCRIBED.into())))
        }
    }
}

/// POST /api/v1/public/newsletter/unsubscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(input): Json<UnsubscribeRequest>,
) -> AppResult<Json<DataResponse<NewsletterSubscriber>>> {
    let email = normalize_email(input.email.as_deref())?;
    let pool = state.public_db()?;

    let subscriber = retry_query(&state.config.retry, || NewsletterRepo::unsubscribe(pool, &email))
        .await?
        .ok_or_else(|| AppError::NotFound("Email is not subscribed".into()))?;

    tracing::info!(subscriber_id = subscriber.id, "Newsletter subscription cancelled");
    Ok(Json(DataResponse::new(subscriber)))
}

/// DELETE /api/v1/admin/newsletter/{id}
pub async fn admin_delete(
    State(state): State<AppState>,
    RequireAdmin(user, _): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let pool = state.service_db()?;
    let deleted = retry_query(&state.config.retry, || NewsletterRepo::delete(pool, id)).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Subscriber",
            id,
        }));
    }
    log_activity::<NewsletterSubscriber>(pool, Some(user.user_id), ACTION_DELETE, id).await;
    Ok(StatusCode::NO_CONTENT)
}
