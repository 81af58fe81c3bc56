//! Assembly of recurring event descriptors from schedule rows.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::event_id::generate_event_id;
use crate::row::{ScheduleRow, SessionType};
use crate::term::TermWindow;
use crate::weekday::{Weekday, first_occurrence};

/// 12-hour clock with meridiem, e.g. "10:00 AM"
const TIME_FORMAT: &str = "%I:%M %p";

/// One weekly recurring event, ready to submit to a calendar sink.
///
/// Only the first occurrence is materialized here; the `recurrence` rule
/// makes the calendar service expand the remaining weeks itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDescriptor {
    /// Caller-supplied id, a pure function of the row (see `event_id`).
    pub id: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    /// Wall-clock start of the first occurrence, interpreted in `timezone`.
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// IANA zone name the calendar service interprets the times in.
    pub timezone: String,
    /// RRULE lines, e.g. `RRULE:FREQ=WEEKLY;UNTIL=20240406T000000Z`
    pub recurrence: Vec<String>,
}

/// Build the recurring event for one schedule row.
///
/// Failures here are row-scoped: an unrecognized day name or a time that
/// isn't 12-hour clock skips this row only, never the batch.
pub fn build_event(row: &ScheduleRow, term: &TermWindow) -> ScheduleResult<EventDescriptor> {
    let session_type = SessionType::classify(&row.course_name);

    let weekday = Weekday::from_name(&row.day)?;
    let first_date = first_occurrence(term.start_date, weekday);

    let start_time = parse_time(&row.start_time)?;
    let end_time = parse_time(&row.end_time)?;

    // The raw start-time text feeds the id, not the parsed value: if the
    // source formatting changes, the identity changes with it.
    let id = generate_event_id(&row.course_code, session_type, &row.day, &row.start_time);

    Ok(EventDescriptor {
        id,
        summary: format!(
            "{} – {} ({})",
            row.course_code, row.course_name, session_type
        ),
        description: format!("Session: {}\nCourse: {}", session_type, row.course_name),
        location: row.location.clone(),
        start: first_date.and_time(start_time),
        end: first_date.and_time(end_time),
        timezone: term.timezone.clone(),
        recurrence: vec![format!(
            "RRULE:FREQ=WEEKLY;UNTIL={}",
            term.recurrence_until()
        )],
    })
}

fn parse_time(text: &str) -> ScheduleResult<NaiveTime> {
    NaiveTime::parse_from_str(text, TIME_FORMAT)
        .map_err(|_| ScheduleError::InvalidTime(text.to_string()))
}
