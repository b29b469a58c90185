use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Created,
    Canceled,
}

impl JobStatus {
    /// Single source of truth for legal job transitions: a job is canceled
    /// once and never reversed.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!((self, next), (JobStatus::Created, JobStatus::Canceled))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Created => "CREATED",
            JobStatus::Canceled => "CANCELED",
        }
    }

    pub fn parse(s: &str) -> Option<JobStatus> {
        match s {
            "CREATED" => Some(JobStatus::Created),
            "CANCELED" => Some(JobStatus::Canceled),
            _ => None,
        }
    }
}

/// A multi-day work engagement booked by a company. The job owns its shifts
/// by identity only; each shift carries a `job_id` for lookup, never a live
/// back-pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: JobStatus,
    pub shift_ids: Vec<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
