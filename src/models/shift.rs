use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every shift spans the same fixed work window on its calendar day, UTC.
pub const SHIFT_START_HOUR: u32 = 8;
pub const SHIFT_END_HOUR: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftStatus {
    Created,
    Booked,
    Canceled,
    Completed,
}

impl ShiftStatus {
    /// Single source of truth for legal shift transitions. `Canceled` and
    /// `Completed` are terminal; no in-scope operation produces `Completed`.
    pub fn can_transition_to(self, next: ShiftStatus) -> bool {
        matches!(
            (self, next),
            (ShiftStatus::Created, ShiftStatus::Booked)
                | (ShiftStatus::Created, ShiftStatus::Canceled)
                | (ShiftStatus::Booked, ShiftStatus::Canceled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Created => "CREATED",
            ShiftStatus::Booked => "BOOKED",
            ShiftStatus::Canceled => "CANCELED",
            ShiftStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(s: &str) -> Option<ShiftStatus> {
        match s {
            "CREATED" => Some(ShiftStatus::Created),
            "BOOKED" => Some(ShiftStatus::Booked),
            "CANCELED" => Some(ShiftStatus::Canceled),
            "COMPLETED" => Some(ShiftStatus::Completed),
            _ => None,
        }
    }
}

/// One calendar day's bookable work window belonging to exactly one job.
/// `version` is the optimistic-concurrency token checked on every write;
/// `talent_id` is set by booking and kept after cancellation so the booking
/// history stays on the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: Uuid,
    pub version: i64,
    pub job_id: Uuid,
    pub talent_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ShiftStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// The 08:00-16:00 UTC window on the given day.
pub fn shift_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date
        .and_hms_opt(SHIFT_START_HOUR, 0, 0)
        .expect("08:00 is a valid time of day")
        .and_utc();
    let end = date
        .and_hms_opt(SHIFT_END_HOUR, 0, 0)
        .expect("16:00 is a valid time of day")
        .and_utc();
    (start, end)
}

impl Shift {
    /// A fresh, unbooked shift covering the fixed window on `date`.
    pub fn new(job_id: Uuid, date: NaiveDate) -> Self {
        let (start_time, end_time) = shift_window(date);
        Self {
            id: Uuid::new_v4(),
            version: 0,
            job_id,
            talent_id: None,
            start_time,
            end_time,
            status: ShiftStatus::Created,
            created_at: None,
            updated_at: None,
        }
    }

    /// A replacement shift reopening the slot of a canceled one: same job,
    /// same window, no talent.
    pub fn replacing(canceled: &Shift) -> Self {
        Self {
            id: Uuid::new_v4(),
            version: 0,
            job_id: canceled.job_id,
            talent_id: None,
            start_time: canceled.start_time,
            end_time: canceled.end_time,
            status: ShiftStatus::Created,
            created_at: None,
            updated_at: None,
        }
    }
}
