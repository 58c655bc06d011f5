//! Calendar-day arithmetic under an explicit timezone policy
//!
//! Streaks and weekly counts compare timestamps by their local calendar date
//! (truncated to local midnight), never by elapsed 24-hour periods. The
//! timezone is a fixed UTC offset supplied by configuration.

use crate::errors::AppError;
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc,
};

/// Largest offset accepted from configuration (UTC-14:00 .. UTC+14:00)
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Maps instants onto local calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc()
    }
}

impl DayBoundary {
    /// Day boundaries at UTC midnight
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Day boundaries at local midnight for a fixed offset east of UTC
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, AppError> {
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(AppError::Config(format!(
                "UTC offset {} minutes is outside +/-{}",
                minutes, MAX_OFFSET_MINUTES
            )));
        }
        FixedOffset::east_opt(minutes * 60)
            .map(|offset| Self { offset })
            .ok_or_else(|| AppError::Config(format!("Invalid UTC offset: {} minutes", minutes)))
    }

    /// Local calendar date of an instant
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Whole calendar days from `earlier` to `later` (negative when reversed)
    pub fn days_between(&self, earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
        (self.local_date(later) - self.local_date(earlier)).num_days()
    }

    /// The UTC instant of local midnight starting `date`
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let shift = Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&(local_midnight - shift))
    }

    /// Start of the calendar week containing `now`
    ///
    /// Weeks begin on Sunday at local midnight.
    pub fn week_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = self.local_date(now);
        let days_from_sunday = i64::from(today.weekday().num_days_from_sunday());
        self.start_of_day(today - Duration::days(days_from_sunday))
    }
}
