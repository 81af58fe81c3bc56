//! Weekday names and first-occurrence resolution.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{ScheduleError, ScheduleResult};

/// Day of the week as it appears in the schedule's "Day" column.
///
/// Parsing is an exact match on the seven English names; anything else
/// (including lowercase variants) is rejected so a typo in the input never
/// silently lands a class on the wrong day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn from_name(name: &str) -> ScheduleResult<Self> {
        match name {
            "Monday" => Ok(Weekday::Monday),
            "Tuesday" => Ok(Weekday::Tuesday),
            "Wednesday" => Ok(Weekday::Wednesday),
            "Thursday" => Ok(Weekday::Thursday),
            "Friday" => Ok(Weekday::Friday),
            "Saturday" => Ok(Weekday::Saturday),
            "Sunday" => Ok(Weekday::Sunday),
            other => Err(ScheduleError::InvalidWeekday(other.to_string())),
        }
    }

    /// Monday = 0 ... Sunday = 6
    pub fn ordinal(self) -> i64 {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }
}

/// First date on or after `term_start` falling on `weekday`.
///
/// If the term starts on the requested weekday the start date itself is
/// returned.
pub fn first_occurrence(term_start: NaiveDate, weekday: Weekday) -> NaiveDate {
    let start_ordinal = i64::from(term_start.weekday().num_days_from_monday());
    let delta = (weekday.ordinal() - start_ordinal).rem_euclid(7);
    term_start + Duration::days(delta)
}
