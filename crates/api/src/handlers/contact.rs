//! Public contact form.
//!
//! The admin inbox (list, read, triage, delete) goes through the generic
//! collection handlers.

use archsite_db::models::contact_submission::{ContactSubmission, CreateContactSubmission};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppResult;
use crate::handlers::collection::create_record;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/public/contact
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<CreateContactSubmission>,
) -> AppResult<(StatusCode, Json<DataResponse<ContactSubmission>>)> {
    let pool = state.public_db()?;
    let submission = create_record::<ContactSubmission>(&state, pool, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(submission))))
}
