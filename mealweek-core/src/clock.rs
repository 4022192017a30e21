//! Source of "today" and of the timestamps used for new ids.

use chrono::{Local, NaiveDate};
#[cfg(any(test, feature = "test-util"))]
use std::cell::Cell;

pub trait Clock {
    /// The current local calendar date.
    fn today(&self) -> NaiveDate;

    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone)]
pub struct FixedClock {
    millis: Cell<i64>,
}

#[cfg(any(test, feature = "test-util"))]
impl FixedClock {
    /// A clock reading midnight UTC of `date`.
    pub fn at(date: NaiveDate) -> Self {
        let millis = date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis();
        Self {
            millis: Cell::new(millis),
        }
    }

    pub fn set_date(&self, date: NaiveDate) {
        self.millis.set(Self::at(date).now_millis());
    }

    pub fn advance_millis(&self, millis: i64) {
        self.millis.set(self.millis.get() + millis);
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        chrono::DateTime::from_timestamp_millis(self.millis.get())
            .map(|dt| dt.date_naive())
            .unwrap_or_default()
    }

    fn now_millis(&self) -> i64 {
        self.millis.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}
