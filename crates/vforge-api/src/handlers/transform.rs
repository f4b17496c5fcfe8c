//! Transform handlers.
//!
//! Every route runs the same sequence: receive the form, build the job,
//! drop whatever the job did not claim, run the pipeline.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use vforge_models::{Operation, TransformResponse, ValidationError};
use vforge_worker::Job;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::upload::UploadedForm;

/// POST /trim
pub async fn trim(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    respond(&state, Operation::Trim, multipart).await
}

/// POST /crop
pub async fn crop(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    respond(&state, Operation::Crop, multipart).await
}

/// POST /add-voice
pub async fn add_voice(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    respond(&state, Operation::AddVoice, multipart).await
}

/// POST /add-caption
pub async fn add_caption(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    respond(&state, Operation::AddCaption, multipart).await
}

/// POST /merge
pub async fn merge(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    respond(&state, Operation::Merge, multipart).await
}

async fn respond(
    state: &AppState,
    operation: Operation,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match run_operation(state, operation, multipart).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response_for(state.config.is_production()),
    }
}

async fn run_operation(
    state: &AppState,
    operation: Operation,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<TransformResponse> {
    let multipart = multipart
        .map_err(|e| ApiError::Validation(ValidationError::malformed(e.body_text())))?;

    let mut form = UploadedForm::receive(multipart, &state.scratch).await?;
    let job = Job::build(operation, &mut form, &state.scratch);
    form.discard().await;

    let artifact = state.pipeline.execute(job?).await?;
    Ok(TransformResponse::success(artifact.url))
}
