use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::job::{Job, JobStatus};
use crate::models::shift::{shift_window, Shift, ShiftStatus};
use crate::services::shift_service::ShiftService;
use crate::store::{Datastore, JobStore, ShiftStore, UnitOfWork};
use crate::utils::clock::Clock;

/// Owns job creation (with per-day shift generation) and whole-job
/// cancellation, which cascades to every shift through the invariant-bypass
/// path on the shift service.
#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn Datastore>,
    clock: Arc<dyn Clock>,
    shift_service: ShiftService,
}

impl JobService {
    pub fn new(store: Arc<dyn Datastore>, clock: Arc<dyn Clock>, shift_service: ShiftService) -> Self {
        Self {
            store,
            clock,
            shift_service,
        }
    }

    /// Creates a job spanning `[start_date, end_date]` with one shift per
    /// calendar day, persisted together in one unit of work. Nothing is
    /// written when validation fails.
    pub async fn create(
        &self,
        company_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(Job, Vec<Shift>)> {
        if start_date < self.clock.today() {
            return Err(Error::BadRequest(
                "start date of a job cannot be in the past".to_string(),
            ));
        }
        if end_date < start_date {
            return Err(Error::BadRequest(
                "end date of a job cannot be before its start date".to_string(),
            ));
        }

        let job_id = Uuid::new_v4();
        let shifts: Vec<Shift> = start_date
            .iter_days()
            .take_while(|date| *date <= end_date)
            .map(|date| Shift::new(job_id, date))
            .collect();

        let (job_start, _) = shift_window(start_date);
        let (_, job_end) = shift_window(end_date);
        let job = Job {
            id: job_id,
            company_id,
            start_time: job_start,
            end_time: job_end,
            status: JobStatus::Created,
            shift_ids: shifts.iter().map(|s| s.id).collect(),
            created_at: None,
            updated_at: None,
        };

        let mut uow = UnitOfWork::new();
        uow.save_job(job.clone());
        for shift in &shifts {
            uow.save_shift(shift.clone());
        }
        self.store.commit(uow).await?;

        info!(%job_id, %company_id, shifts = shifts.len(), "job created");
        Ok((job, shifts))
    }

    /// Cancels a job and every one of its shifts in one unit of work,
    /// bypassing last-shift protection. Canceling an already-canceled job is
    /// an idempotent no-op so retrying clients stay safe.
    pub async fn cancel(&self, job_id: Uuid) -> Result<()> {
        let mut job = self
            .store
            .find_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("job {job_id} not found")))?;

        if job.status == JobStatus::Canceled {
            debug!(%job_id, "job already canceled, nothing to do");
            return Ok(());
        }

        job.status = JobStatus::Canceled;
        let mut uow = UnitOfWork::new();
        uow.save_job(job);

        let shifts = self.store.find_shifts_by_job(job_id).await?;
        let mut cascaded = 0usize;
        for mut shift in shifts {
            if shift.status != ShiftStatus::Canceled {
                cascaded += 1;
            }
            self.shift_service
                .cancel_as_part_of_job_cancellation(&mut shift, &mut uow);
        }

        self.store.commit(uow).await?;
        info!(%job_id, cascaded, "job canceled");
        Ok(())
    }

    /// Pure read.
    pub async fn fetch(&self, job_id: Uuid) -> Result<Job> {
        self.store
            .find_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("job {job_id} not found")))
    }
}
