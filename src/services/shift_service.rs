use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::job::{Job, JobStatus};
use crate::models::shift::{Shift, ShiftStatus};
use crate::store::{Datastore, JobStore, ShiftStore, UnitOfWork};

/// Owns every shift state transition: booking, invariant-enforced single
/// cancellation, the bypass cancellation used by the job cascade, and
/// per-talent cancellation with replacement generation.
#[derive(Clone)]
pub struct ShiftService {
    store: Arc<dyn Datastore>,
}

impl ShiftService {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    /// Books a talent onto a shift. Only a shift that is still exactly
    /// `Created` can be booked; a stale concurrent write fails `Conflict`
    /// at commit, so two racing bookings resolve to one winner.
    pub async fn book(&self, shift_id: Uuid, talent_id: Uuid) -> Result<()> {
        let mut shift = self.load_shift(shift_id).await?;

        if !shift.status.can_transition_to(ShiftStatus::Booked) {
            return Err(Error::CannotBook { shift_id });
        }

        shift.talent_id = Some(talent_id);
        shift.status = ShiftStatus::Booked;

        let mut uow = UnitOfWork::new();
        uow.save_shift(shift);
        self.store.commit(uow).await?;

        info!(%shift_id, %talent_id, "shift booked");
        Ok(())
    }

    /// Cancels a single shift, enforcing last-shift protection: the sole
    /// remaining non-canceled shift of a live job cannot be canceled.
    pub async fn cancel(&self, shift_id: Uuid) -> Result<()> {
        let mut shift = self.load_shift(shift_id).await?;
        let job = self.load_job(shift.job_id).await?;

        let mut uow = UnitOfWork::new();
        self.cancel_guarded(&mut shift, &job, &mut uow).await?;
        self.store.commit(uow).await?;

        info!(%shift_id, "shift canceled");
        Ok(())
    }

    /// Bypass cancellation used only by the whole-job cascade: stages the
    /// shift as canceled without consulting the last-shift count. Already
    /// canceled shifts are left alone.
    pub(crate) fn cancel_as_part_of_job_cancellation(
        &self,
        shift: &mut Shift,
        uow: &mut UnitOfWork,
    ) {
        if shift.status == ShiftStatus::Canceled {
            return;
        }
        shift.status = ShiftStatus::Canceled;
        uow.save_shift(shift.clone());
    }

    /// Cancels every active shift held by a talent and reopens each slot with
    /// a replacement shift on the same job. One commit at the end: if any
    /// shift in the sequence trips last-shift protection, nothing persists.
    pub async fn cancel_for_talent(&self, talent_id: Uuid) -> Result<()> {
        let shifts = self.store.find_shifts_by_talent(talent_id).await?;
        if shifts.is_empty() {
            return Err(Error::ShiftsForTalentNotFound { talent_id });
        }

        let active: Vec<Shift> = shifts
            .into_iter()
            .filter(|s| s.status != ShiftStatus::Canceled)
            .collect();
        if active.is_empty() {
            return Err(Error::NoAvailableShift { talent_id });
        }

        let mut uow = UnitOfWork::new();
        // Working set of owning jobs, loaded once each; replacement ids are
        // appended here and the jobs staged at the end.
        let mut jobs: BTreeMap<Uuid, Job> = BTreeMap::new();
        let replaced = active.len();

        for mut shift in active {
            let job_id = shift.job_id;
            if !jobs.contains_key(&job_id) {
                let job = self.load_job(job_id).await?;
                jobs.insert(job_id, job);
            }
            let job = jobs
                .get_mut(&job_id)
                .ok_or_else(|| Error::Internal("job missing from working set".to_string()))?;

            self.cancel_guarded(&mut shift, job, &mut uow).await?;

            let replacement = Shift::replacing(&shift);
            job.shift_ids.push(replacement.id);
            uow.save_shift(replacement);
        }

        for job in jobs.into_values() {
            uow.save_job(job);
        }
        self.store.commit(uow).await?;

        info!(%talent_id, replaced, "canceled talent shifts and created replacements");
        Ok(())
    }

    /// All shifts of a job, ordered by start time ascending. An empty result
    /// is reported as not-found; callers that need to tell a shiftless job
    /// from a missing one fetch the job first.
    pub async fn fetch_by_job_id(&self, job_id: Uuid) -> Result<Vec<Shift>> {
        let shifts = self.store.find_shifts_by_job(job_id).await?;
        if shifts.is_empty() {
            return Err(Error::NotFound(format!("no shifts found for job {job_id}")));
        }
        Ok(shifts)
    }

    /// Stages a guarded cancellation: rejects re-cancellation, rejects
    /// illegal transitions, and refuses to take a live job's last
    /// non-canceled shift.
    async fn cancel_guarded(
        &self,
        shift: &mut Shift,
        job: &Job,
        uow: &mut UnitOfWork,
    ) -> Result<()> {
        if shift.status == ShiftStatus::Canceled {
            return Err(Error::AlreadyCanceled { shift_id: shift.id });
        }
        if !shift.status.can_transition_to(ShiftStatus::Canceled) {
            return Err(Error::Conflict(format!(
                "shift {} cannot be canceled from status {}",
                shift.id,
                shift.status.as_str()
            )));
        }

        if job.status != JobStatus::Canceled {
            let active = self
                .store
                .count_shifts_by_job_excluding(job.id, ShiftStatus::Canceled)
                .await?;
            if active <= 1 {
                debug!(shift_id = %shift.id, job_id = %job.id, "last active shift, refusing");
                return Err(Error::LastShiftProtected { shift_id: shift.id });
            }
        }

        shift.status = ShiftStatus::Canceled;
        uow.save_shift(shift.clone());
        Ok(())
    }

    async fn load_shift(&self, shift_id: Uuid) -> Result<Shift> {
        self.store
            .find_shift(shift_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("shift {shift_id} not found")))
    }

    async fn load_job(&self, job_id: Uuid) -> Result<Job> {
        self.store
            .find_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("job {job_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::job_service::JobService;
    use crate::store::memory::MemoryStore;
    use crate::store::{JobStore, ShiftStore};
    use crate::utils::clock::FixedClock;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    fn setup() -> (Arc<MemoryStore>, JobService, ShiftService) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
        ));
        let shift_service = ShiftService::new(store.clone());
        let job_service = JobService::new(store.clone(), clock, shift_service.clone());
        (store, job_service, shift_service)
    }

    async fn seeded_job(jobs: &JobService, days: i64) -> (Uuid, Vec<Shift>) {
        let (job, shifts) = jobs
            .create(Uuid::new_v4(), today(), today() + Duration::days(days - 1))
            .await
            .unwrap();
        (job.id, shifts)
    }

    #[tokio::test]
    async fn book_sets_talent_and_status() {
        let (store, jobs, svc) = setup();
        let (_, shifts) = seeded_job(&jobs, 2).await;
        let talent = Uuid::new_v4();

        svc.book(shifts[0].id, talent).await.unwrap();

        let stored = store.find_shift(shifts[0].id).await.unwrap().unwrap();
        assert_eq!(stored.status, ShiftStatus::Booked);
        assert_eq!(stored.talent_id, Some(talent));
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn book_missing_shift_fails_not_found() {
        let (_, _, svc) = setup();
        let err = svc.book(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn book_booked_shift_fails_and_keeps_first_talent() {
        let (store, jobs, svc) = setup();
        let (_, shifts) = seeded_job(&jobs, 2).await;
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        svc.book(shifts[0].id, first).await.unwrap();
        let err = svc.book(shifts[0].id, second).await.unwrap_err();
        assert!(matches!(err, Error::CannotBook { .. }));

        let stored = store.find_shift(shifts[0].id).await.unwrap().unwrap();
        assert_eq!(stored.talent_id, Some(first));
        assert_eq!(stored.status, ShiftStatus::Booked);
    }

    #[tokio::test]
    async fn book_canceled_shift_fails_cannot_book() {
        let (_, jobs, svc) = setup();
        let (_, shifts) = seeded_job(&jobs, 2).await;

        svc.cancel(shifts[0].id).await.unwrap();
        let err = svc.book(shifts[0].id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::CannotBook { .. }));
    }

    #[tokio::test]
    async fn racing_bookings_produce_exactly_one_winner() {
        let (store, jobs, svc) = setup();
        let (_, shifts) = seeded_job(&jobs, 2).await;
        let shift_id = shifts[0].id;
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

        let (a, b) = tokio::join!(svc.book(shift_id, alice), svc.book(shift_id, bob));
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);

        let stored = store.find_shift(shift_id).await.unwrap().unwrap();
        assert_eq!(stored.status, ShiftStatus::Booked);
        let winner = if a.is_ok() { alice } else { bob };
        assert_eq!(stored.talent_id, Some(winner));
    }

    #[tokio::test]
    async fn cancel_refuses_the_last_active_shift() {
        let (store, jobs, svc) = setup();
        let (_, shifts) = seeded_job(&jobs, 1).await;

        let err = svc.cancel(shifts[0].id).await.unwrap_err();
        assert!(matches!(err, Error::LastShiftProtected { .. }));

        let stored = store.find_shift(shifts[0].id).await.unwrap().unwrap();
        assert_eq!(stored.status, ShiftStatus::Created);
    }

    #[tokio::test]
    async fn cancel_succeeds_while_other_shifts_remain_active() {
        let (store, jobs, svc) = setup();
        let (job_id, shifts) = seeded_job(&jobs, 2).await;

        svc.cancel(shifts[0].id).await.unwrap();

        let active = store
            .count_shifts_by_job_excluding(job_id, ShiftStatus::Canceled)
            .await
            .unwrap();
        assert_eq!(active, 1);
    }

    #[tokio::test]
    async fn cancel_twice_fails_already_canceled() {
        let (_, jobs, svc) = setup();
        let (_, shifts) = seeded_job(&jobs, 2).await;

        svc.cancel(shifts[0].id).await.unwrap();
        let err = svc.cancel(shifts[0].id).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyCanceled { .. }));
    }

    #[tokio::test]
    async fn cancel_for_talent_replaces_each_active_shift() {
        let (store, jobs, svc) = setup();
        let talent = Uuid::new_v4();

        // Job A: talent holds one of three shifts.
        let (job_a, shifts_a) = seeded_job(&jobs, 3).await;
        svc.book(shifts_a[0].id, talent).await.unwrap();

        // Job B: talent holds one active shift and one already canceled.
        let (job_b, shifts_b) = seeded_job(&jobs, 3).await;
        svc.book(shifts_b[0].id, talent).await.unwrap();
        svc.book(shifts_b[1].id, talent).await.unwrap();
        svc.cancel(shifts_b[1].id).await.unwrap();

        svc.cancel_for_talent(talent).await.unwrap();

        // Both active shifts canceled, talent kept on the records.
        for id in [shifts_a[0].id, shifts_b[0].id] {
            let stored = store.find_shift(id).await.unwrap().unwrap();
            assert_eq!(stored.status, ShiftStatus::Canceled);
            assert_eq!(stored.talent_id, Some(talent));
        }

        // One replacement per canceled shift: same job, same window, open.
        for (job_id, original) in [(job_a, &shifts_a[0]), (job_b, &shifts_b[0])] {
            let stored = store.find_shifts_by_job(job_id).await.unwrap();
            assert_eq!(stored.len(), 4);
            let replacement = stored
                .iter()
                .find(|s| s.status == ShiftStatus::Created && s.start_time == original.start_time)
                .expect("replacement shift");
            assert!(replacement.talent_id.is_none());
            assert_eq!(replacement.end_time, original.end_time);
        }

        // The replacement ids were appended to the owning jobs.
        let job = store.find_job(job_a).await.unwrap().unwrap();
        assert_eq!(job.shift_ids.len(), 4);

        // The shift canceled before the call is untouched beyond its state.
        let untouched = store.find_shift(shifts_b[1].id).await.unwrap().unwrap();
        assert_eq!(untouched.status, ShiftStatus::Canceled);
        assert_eq!(untouched.talent_id, Some(talent));
    }

    #[tokio::test]
    async fn cancel_for_talent_with_no_shifts_fails_not_found() {
        let (_, _, svc) = setup();
        let err = svc.cancel_for_talent(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::ShiftsForTalentNotFound { .. }));
    }

    #[tokio::test]
    async fn cancel_for_talent_with_only_canceled_shifts_fails_no_available() {
        let (_, jobs, svc) = setup();
        let talent = Uuid::new_v4();
        let (_, shifts) = seeded_job(&jobs, 2).await;

        svc.book(shifts[0].id, talent).await.unwrap();
        svc.cancel(shifts[0].id).await.unwrap();

        let err = svc.cancel_for_talent(talent).await.unwrap_err();
        assert!(matches!(err, Error::NoAvailableShift { .. }));
    }

    #[tokio::test]
    async fn cancel_for_talent_aborts_wholly_on_last_shift_protection() {
        let (store, jobs, svc) = setup();
        let talent = Uuid::new_v4();

        // Two jobs; the talent's shift on the second is its job's only shift,
        // so the sequence must trip protection and nothing may persist.
        let (_, shifts_a) = seeded_job(&jobs, 2).await;
        svc.book(shifts_a[0].id, talent).await.unwrap();
        let (_, shifts_b) = seeded_job(&jobs, 1).await;
        svc.book(shifts_b[0].id, talent).await.unwrap();

        let before = store.shift_count();
        let err = svc.cancel_for_talent(talent).await.unwrap_err();
        assert!(matches!(err, Error::LastShiftProtected { .. }));

        assert_eq!(store.shift_count(), before);
        for shift in [&shifts_a[0], &shifts_b[0]] {
            let stored = store.find_shift(shift.id).await.unwrap().unwrap();
            assert_eq!(stored.status, ShiftStatus::Booked);
        }
    }

    #[tokio::test]
    async fn fetch_by_job_id_orders_by_start_time() {
        let (_, jobs, svc) = setup();
        let (job_id, shifts) = seeded_job(&jobs, 3).await;

        let listed = svc.fetch_by_job_id(job_id).await.unwrap();
        assert_eq!(
            listed.iter().map(|s| s.id).collect::<Vec<_>>(),
            shifts.iter().map(|s| s.id).collect::<Vec<_>>()
        );
        assert!(listed.windows(2).all(|w| w[0].start_time <= w[1].start_time));
    }

    #[tokio::test]
    async fn fetch_by_job_id_with_no_shifts_fails_not_found() {
        let (_, _, svc) = setup();
        let err = svc.fetch_by_job_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
