use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{CreateJobPayload, JobCreatedResponse, JobResponse},
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/job",
    responses(
        (status = 201, description = "Job created with one shift per day"),
        (status = 400, description = "Start date in the past or end before start")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (job, shifts) = state
        .job_service
        .create(payload.company_id, payload.start, payload.end)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(JobCreatedResponse::from_parts(job, shifts)),
    ))
}

#[utoipa::path(
    patch,
    path = "/job/{job_id}",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 204, description = "Job and all of its shifts canceled"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn cancel_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.cancel(job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/job/{job_id}",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.fetch(job_id).await?;
    Ok(Json(JobResponse::from(job)))
}
