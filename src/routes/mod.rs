pub mod health;
pub mod job;
pub mod shift;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/job", post(job::create_job))
        .route("/job/:job_id", get(job::get_job).patch(job::cancel_job))
        // GET lists a job's shifts, PATCH cancels a single shift; one route
        // entry because axum rejects overlapping patterns.
        .route("/shift/:id", get(shift::list_shifts).patch(shift::cancel_shift))
        .route("/shift/book/:shift_id", patch(shift::book_shift))
        .route(
            "/shift/talent/:talent_id",
            patch(shift::cancel_shifts_for_talent),
        )
        .with_state(state)
}
