use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::shift_dto::{BookTalentPayload, ShiftResponse, ShiftsResponse},
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/shift/{job_id}",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Shifts for the job, ordered by start time"),
        (status = 404, description = "No shifts found for the job")
    )
)]
#[axum::debug_handler]
pub async fn list_shifts(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let shifts = state.shift_service.fetch_by_job_id(job_id).await?;
    Ok(Json(ShiftsResponse {
        shifts: shifts.into_iter().map(ShiftResponse::from).collect(),
    }))
}

#[utoipa::path(
    patch,
    path = "/shift/book/{shift_id}",
    params(
        ("shift_id" = Uuid, Path, description = "Shift ID")
    ),
    responses(
        (status = 204, description = "Talent booked onto the shift"),
        (status = 404, description = "Shift not found"),
        (status = 409, description = "Shift is not bookable")
    )
)]
#[axum::debug_handler]
pub async fn book_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<Uuid>,
    Json(payload): Json<BookTalentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state.shift_service.book(shift_id, payload.talent).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/shift/{shift_id}",
    params(
        ("shift_id" = Uuid, Path, description = "Shift ID")
    ),
    responses(
        (status = 204, description = "Shift canceled"),
        (status = 404, description = "Shift not found"),
        (status = 409, description = "Already canceled or last active shift of its job")
    )
)]
#[axum::debug_handler]
pub async fn cancel_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.shift_service.cancel(shift_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/shift/talent/{talent_id}",
    params(
        ("talent_id" = Uuid, Path, description = "Talent ID")
    ),
    responses(
        (status = 204, description = "Active shifts canceled and replacements created"),
        (status = 404, description = "No shifts found for the talent"),
        (status = 409, description = "No active shifts, or a shift is protected")
    )
)]
#[axum::debug_handler]
pub async fn cancel_shifts_for_talent(
    State(state): State<AppState>,
    Path(talent_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.shift_service.cancel_for_talent(talent_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
