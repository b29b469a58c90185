use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::shift_dto::ShiftResponse;
use crate::models::job::{Job, JobStatus};
use crate::models::shift::Shift;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    pub company_id: Uuid,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreatedResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub shifts: Vec<ShiftResponse>,
}

impl JobCreatedResponse {
    pub fn from_parts(job: Job, shifts: Vec<Shift>) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            shifts: shifts.into_iter().map(ShiftResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub job_id: Uuid,
    pub company_id: Uuid,
    pub status: JobStatus,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub shift_ids: Vec<Uuid>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id,
            company_id: job.company_id,
            status: job.status,
            start: job.start_time,
            end: job.end_time,
            shift_ids: job.shift_ids,
        }
    }
}
