//! Monday-start week arithmetic and the `YYYY-MM-DD` week keys plans are
//! stored under.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const KEY_FORMAT: &str = "%Y-%m-%d";

/// Errors from parsing a week key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeekKeyError {
    #[error("Invalid week key '{0}': expected YYYY-MM-DD")]
    InvalidFormat(String),

    #[error("Invalid week key '{0}': {1} is a {2}, weeks start on Monday")]
    NotMonday(String, NaiveDate, Weekday),

    #[error("Invalid week key '{0}': week is outside the supported date range")]
    OutOfRange(String),
}

/// The Monday on or before `date`, clamped to the first representable date.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = Duration::days(i64::from(date.weekday().num_days_from_monday()));
    date.checked_sub_signed(back).unwrap_or(NaiveDate::MIN)
}

/// The Monday on or before `date`, or `None` if any day of that week is
/// outside chrono's date range.
pub fn checked_week_start(date: NaiveDate) -> Option<NaiveDate> {
    let back = Duration::days(i64::from(date.weekday().num_days_from_monday()));
    let start = date.checked_sub_signed(back)?;
    start.checked_add_signed(Duration::days(6))?;
    Some(start)
}

/// The seven dates of the week starting at `start`, Monday first.
pub fn week_dates(start: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|offset| {
        start
            .checked_add_signed(Duration::days(offset as i64))
            .unwrap_or(NaiveDate::MAX)
    })
}

/// Human label for a week, e.g. `Jan 6 - Jan 12, 2025`.
pub fn format_week_range(start: NaiveDate) -> String {
    let end = week_dates(start)[6];
    format!("{} - {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
}

/// Identifies a Monday-start week by its Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// Key of the week containing `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self(week_start(date))
    }

    /// The Monday this key stands for.
    pub fn start(&self) -> NaiveDate {
        self.0
    }

}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for WeekKey {
    type Err = WeekKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, KEY_FORMAT)
            .map_err(|_| WeekKeyError::InvalidFormat(s.to_string()))?;

        if date.weekday() != Weekday::Mon {
            return Err(WeekKeyError::NotMonday(
                s.to_string(),
                date,
                date.weekday(),
            ));
        }
        if checked_week_start(date).is_none() {
            return Err(WeekKeyError::OutOfRange(s.to_string()));
        }
        Ok(Self(date))
    }
}

impl TryFrom<String> for WeekKey {
    type Error = WeekKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}
