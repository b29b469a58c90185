pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::job::Job;
use crate::models::shift::{Shift, ShiftStatus};

/// A buffer of pending writes for one top-level operation. Nothing touches
/// the store until the whole unit is committed; commit is all-or-nothing.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    pub(crate) jobs: Vec<Job>,
    pub(crate) shifts: Vec<Shift>,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a job write. Staging the same job twice keeps the last copy.
    pub fn save_job(&mut self, job: Job) {
        self.jobs.retain(|j| j.id != job.id);
        self.jobs.push(job);
    }

    /// Stages a shift write. Staging the same shift twice keeps the last copy.
    pub fn save_shift(&mut self, shift: Shift) {
        self.shifts.retain(|s| s.id != shift.id);
        self.shifts.push(shift);
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty() && self.shifts.is_empty()
    }
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>>;
}

#[async_trait]
pub trait ShiftStore: Send + Sync {
    async fn find_shift(&self, id: Uuid) -> Result<Option<Shift>>;

    /// All shifts of a job, ordered by start time ascending.
    async fn find_shifts_by_job(&self, job_id: Uuid) -> Result<Vec<Shift>>;

    async fn find_shifts_by_talent(&self, talent_id: Uuid) -> Result<Vec<Shift>>;

    /// Number of the job's shifts whose status is not `excluded`.
    async fn count_shifts_by_job_excluding(
        &self,
        job_id: Uuid,
        excluded: ShiftStatus,
    ) -> Result<i64>;
}

/// The full persistence contract consumed by the services. A commit applies
/// every staged write atomically; a shift write whose version token no longer
/// matches the stored row fails `Error::Conflict` and nothing lands.
#[async_trait]
pub trait Datastore: JobStore + ShiftStore {
    async fn commit(&self, uow: UnitOfWork) -> Result<()>;
}
