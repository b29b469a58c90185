use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::shift::{Shift, ShiftStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookTalentPayload {
    pub talent: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub talent_id: Option<Uuid>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: ShiftStatus,
}

impl From<Shift> for ShiftResponse {
    fn from(shift: Shift) -> Self {
        Self {
            id: shift.id,
            job_id: shift.job_id,
            talent_id: shift.talent_id,
            start: shift.start_time,
            end: shift.end_time,
            status: shift.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftsResponse {
    pub shifts: Vec<ShiftResponse>,
}
