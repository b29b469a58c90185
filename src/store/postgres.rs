use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::job::{Job, JobStatus};
use crate::models::shift::{Shift, ShiftStatus};
use crate::store::{Datastore, JobStore, ShiftStore, UnitOfWork};

/// Postgres-backed datastore. Statuses are stored as text and mapped through
/// the model enums; a unit of work commits as one SQL transaction, with shift
/// upserts guarded by the version column.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct JobRow {
    id: Uuid,
    company_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct ShiftRow {
    id: Uuid,
    version: i64,
    job_id: Uuid,
    talent_id: Option<Uuid>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JobRow {
    fn into_job(self, shift_ids: Vec<Uuid>) -> Result<Job> {
        let status = JobStatus::parse(&self.status)
            .ok_or_else(|| Error::Internal(format!("unknown job status '{}'", self.status)))?;
        Ok(Job {
            id: self.id,
            company_id: self.company_id,
            start_time: self.start_time,
            end_time: self.end_time,
            status,
            shift_ids,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        })
    }
}

impl TryFrom<ShiftRow> for Shift {
    type Error = Error;

    fn try_from(row: ShiftRow) -> Result<Shift> {
        let status = ShiftStatus::parse(&row.status)
            .ok_or_else(|| Error::Internal(format!("unknown shift status '{}'", row.status)))?;
        Ok(Shift {
            id: row.id,
            version: row.version,
            job_id: row.job_id,
            talent_id: row.talent_id,
            start_time: row.start_time,
            end_time: row.end_time,
            status,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}

const SHIFT_COLUMNS: &str =
    "id, version, job_id, talent_id, start_time, end_time, status, created_at, updated_at";

#[async_trait]
impl JobStore for PgStore {
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(
            "SELECT id, company_id, start_time, end_time, status, created_at, updated_at
             FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let shift_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM shifts WHERE job_id = $1 ORDER BY start_time, created_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        row.into_job(shift_ids).map(Some)
    }
}

#[async_trait]
impl ShiftStore for PgStore {
    async fn find_shift(&self, id: Uuid) -> Result<Option<Shift>> {
        let row = sqlx::query_as::<_, ShiftRow>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Shift::try_from).transpose()
    }

    async fn find_shifts_by_job(&self, job_id: Uuid) -> Result<Vec<Shift>> {
        let rows = sqlx::query_as::<_, ShiftRow>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE job_id = $1 ORDER BY start_time, created_at"
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Shift::try_from).collect()
    }

    async fn find_shifts_by_talent(&self, talent_id: Uuid) -> Result<Vec<Shift>> {
        let rows = sqlx::query_as::<_, ShiftRow>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE talent_id = $1 ORDER BY start_time, created_at"
        ))
        .bind(talent_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Shift::try_from).collect()
    }

    async fn count_shifts_by_job_excluding(
        &self,
        job_id: Uuid,
        excluded: ShiftStatus,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM shifts WHERE job_id = $1 AND status <> $2",
        )
        .bind(job_id)
        .bind(excluded.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[async_trait]
impl Datastore for PgStore {
    async fn commit(&self, uow: UnitOfWork) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for job in &uow.jobs {
            sqlx::query(
                "INSERT INTO jobs (id, company_id, start_time, end_time, status)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (id) DO UPDATE
                 SET status = EXCLUDED.status, updated_at = now()",
            )
            .bind(job.id)
            .bind(job.company_id)
            .bind(job.start_time)
            .bind(job.end_time)
            .bind(job.status.as_str())
            .execute(&mut *tx)
            .await?;
        }

        for shift in &uow.shifts {
            // The upsert only applies when the stored version still matches
            // the token the writer read; otherwise zero rows change and the
            // whole transaction rolls back.
            let result = sqlx::query(
                "INSERT INTO shifts (id, version, job_id, talent_id, start_time, end_time, status)
                 VALUES ($1, 0, $2, $3, $4, $5, $6)
                 ON CONFLICT (id) DO UPDATE
                 SET talent_id = EXCLUDED.talent_id,
                     status = EXCLUDED.status,
                     version = shifts.version + 1,
                     updated_at = now()
                 WHERE shifts.version = $7",
            )
            .bind(shift.id)
            .bind(shift.job_id)
            .bind(shift.talent_id)
            .bind(shift.start_time)
            .bind(shift.end_time)
            .bind(shift.status.as_str())
            .bind(shift.version)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(Error::Conflict(format!(
                    "stale version {} for shift {}",
                    shift.version, shift.id
                )));
            }
        }

        tx.commit().await?;
        Ok(())
    }
}
