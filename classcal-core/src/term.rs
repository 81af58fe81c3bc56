//! Academic term window shared read-only by every imported row.

use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;

use crate::error::{ScheduleError, ScheduleResult};

/// Bounds of the academic term plus the zone events are created in.
#[derive(Debug, Clone)]
pub struct TermWindow {
    pub start_date: NaiveDate,
    /// Last date on which weekly sessions still occur (inclusive).
    pub end_date: NaiveDate,
    /// IANA zone name, passed through to the calendar service as-is.
    pub timezone: String,
}

impl TermWindow {
    /// Validates that the zone name is a real IANA zone and that the window
    /// isn't inverted. The zone is only validated, never used for offset
    /// math; the calendar service interprets it.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, timezone: &str) -> ScheduleResult<Self> {
        Tz::from_str(timezone).map_err(|_| {
            ScheduleError::Config(format!("'{}' is not a valid IANA timezone", timezone))
        })?;

        if end_date < start_date {
            return Err(ScheduleError::Config(format!(
                "term_end_date {} is before term_start_date {}",
                end_date, start_date
            )));
        }

        Ok(TermWindow {
            start_date,
            end_date,
            timezone: timezone.to_string(),
        })
    }

    /// UNTIL bound for the weekly RRULE.
    ///
    /// RRULE UNTIL is exclusive at midnight, so the bound is one day past
    /// the inclusive end date to keep sessions on the final day.
    pub fn recurrence_until(&self) -> String {
        (self.end_date + Duration::days(1))
            .format("%Y%m%dT000000Z")
            .to_string()
    }
}
