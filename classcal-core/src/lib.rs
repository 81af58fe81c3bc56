//! Core types for the classcal importer.
//!
//! This crate holds everything that doesn't touch the network or filesystem:
//! - `ScheduleRow` and session classification
//! - weekday resolution and term window arithmetic
//! - deterministic event-id generation and `EventDescriptor` assembly
//! - the `CalendarSink` trait and the sequential import orchestrator
//!
//! The CLI crate supplies the CSV input, config, OAuth session and the
//! Google Calendar implementation of `CalendarSink`.

pub mod error;
pub mod event;
pub mod event_id;
pub mod import;
pub mod row;
pub mod sink;
pub mod term;
pub mod weekday;

// Re-export the main types at crate root for convenience
pub use error::{ScheduleError, ScheduleResult};
pub use event::{EventDescriptor, build_event};
pub use event_id::generate_event_id;
pub use import::{ImportReport, Importer, RowOutcome};
pub use row::{ScheduleRow, SessionType};
pub use sink::{CalendarSink, CreateOutcome};
pub use term::TermWindow;
pub use weekday::{Weekday, first_occurrence};
