use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::job::Job;
use crate::models::shift::{Shift, ShiftStatus};
use crate::store::{Datastore, JobStore, ShiftStore, UnitOfWork};

/// In-memory datastore with the same commit semantics as the Postgres store:
/// one guarded apply per unit of work, shift writes checked against the
/// stored version token. Used by the test suite and local experiments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    jobs: HashMap<Uuid, Job>,
    shifts: HashMap<Uuid, Shift>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::Internal("memory store mutex poisoned".to_string()))
    }

    pub fn job_count(&self) -> usize {
        self.inner.lock().map(|i| i.jobs.len()).unwrap_or(0)
    }

    pub fn shift_count(&self) -> usize {
        self.inner.lock().map(|i| i.shifts.len()).unwrap_or(0)
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.locked()?.jobs.get(&id).cloned())
    }
}

#[async_trait]
impl ShiftStore for MemoryStore {
    async fn find_shift(&self, id: Uuid) -> Result<Option<Shift>> {
        Ok(self.locked()?.shifts.get(&id).cloned())
    }

    async fn find_shifts_by_job(&self, job_id: Uuid) -> Result<Vec<Shift>> {
        let mut shifts: Vec<Shift> = self
            .locked()?
            .shifts
            .values()
            .filter(|s| s.job_id == job_id)
            .cloned()
            .collect();
        shifts.sort_by_key(|s| (s.start_time, s.created_at));
        Ok(shifts)
    }

    async fn find_shifts_by_talent(&self, talent_id: Uuid) -> Result<Vec<Shift>> {
        let mut shifts: Vec<Shift> = self
            .locked()?
            .shifts
            .values()
            .filter(|s| s.talent_id == Some(talent_id))
            .cloned()
            .collect();
        shifts.sort_by_key(|s| (s.start_time, s.created_at));
        Ok(shifts)
    }

    async fn count_shifts_by_job_excluding(
        &self,
        job_id: Uuid,
        excluded: ShiftStatus,
    ) -> Result<i64> {
        let count = self
            .locked()?
            .shifts
            .values()
            .filter(|s| s.job_id == job_id && s.status != excluded)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn commit(&self, uow: UnitOfWork) -> Result<()> {
        let mut inner = self.locked()?;
        let now = Utc::now();

        // Validate every version token before touching anything, so a late
        // conflict cannot leave a half-applied unit behind.
        for shift in &uow.shifts {
            match inner.shifts.get(&shift.id) {
                Some(existing) if existing.version != shift.version => {
                    return Err(Error::Conflict(format!(
                        "stale version {} for shift {}",
                        shift.version, shift.id
                    )));
                }
                None if shift.version != 0 => {
                    return Err(Error::Conflict(format!(
                        "shift {} does not exist at version {}",
                        shift.id, shift.version
                    )));
                }
                _ => {}
            }
        }

        for mut job in uow.jobs {
            match inner.jobs.get(&job.id) {
                Some(existing) => job.created_at = existing.created_at,
                None => job.created_at = Some(now),
            }
            job.updated_at = Some(now);
            inner.jobs.insert(job.id, job);
        }

        for mut shift in uow.shifts {
            match inner.shifts.get(&shift.id) {
                Some(existing) => {
                    shift.version += 1;
                    shift.created_at = existing.created_at;
                }
                None => shift.created_at = Some(now),
            }
            shift.updated_at = Some(now);
            inner.shifts.insert(shift.id, shift);
        }

        Ok(())
    }
}
