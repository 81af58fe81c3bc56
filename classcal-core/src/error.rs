//! Error types for the classcal import pipeline.

use thiserror::Error;

/// Errors that can occur while building or submitting schedule events.
///
/// `InvalidWeekday` and `InvalidTime` are row-scoped: the orchestrator
/// records them and moves on to the next row. `Sink` covers anything the
/// remote calendar rejects other than a benign duplicate id.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid day name: {0}")]
    InvalidWeekday(String),

    #[error("Invalid time '{0}': expected 12-hour clock like '10:00 AM'")]
    InvalidTime(String),

    #[error("CSV is missing required column(s): {0}")]
    MissingColumn(String),

    #[error("Calendar sink error: {0}")]
    Sink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for classcal operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
