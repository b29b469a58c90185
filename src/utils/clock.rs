use chrono::{DateTime, NaiveDate, Utc};

/// Current-date source injected into the services so date validation is
/// testable without depending on wall-clock time.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0.date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
