use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use folio_relay::DispatchOutcome;
use folio_shared::{ContactSubmission, SuccessBody};

use crate::{error::AppError, routes::AppState};

/// POST /api/contact - Relay one contact-form submission by email
pub async fn action(
    State(app_state): State<AppState>,
    input: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<SuccessBody>, AppError> {
    let Json(submission) = input?;

    match app_state.relay.dispatch(&submission).await {
        DispatchOutcome::Success => Ok(Json(SuccessBody::sent())),
        DispatchOutcome::Failure(kind, detail) => Err(AppError::from_failure(kind, detail)),
    }
}
