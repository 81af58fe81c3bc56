//! Schedule rows and session classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One record from the weekly schedule table, fields already trimmed.
///
/// `day` and the two time columns are kept as raw text: the day name is
/// validated when the event is built, and the raw start-time text feeds the
/// event id so that re-imports of an unchanged row stay deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub course_name: String,
    pub course_code: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
}

/// Kind of scheduled meeting, derived from the course name and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionType {
    Lecture,
    Lab,
    Tutorial,
}

impl SessionType {
    /// Case-insensitive substring classification.
    ///
    /// "lab" is checked before "tutorial", so a name containing both counts
    /// as a lab. Anything else is a lecture.
    pub fn classify(course_name: &str) -> Self {
        let lower = course_name.to_lowercase();
        if lower.contains("lab") {
            SessionType::Lab
        } else if lower.contains("tutorial") {
            SessionType::Tutorial
        } else {
            SessionType::Lecture
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionType::Lecture => "Lecture",
            SessionType::Lab => "Lab",
            SessionType::Tutorial => "Tutorial",
        };
        write!(f, "{}", name)
    }
}
