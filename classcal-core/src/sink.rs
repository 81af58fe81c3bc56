//! Calendar sink protocol.

use async_trait::async_trait;

use crate::error::ScheduleResult;
use crate::event::EventDescriptor;

/// Outcome of an idempotent create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// An event with the same id already exists. Benign: this is the
    /// re-import path, not an error.
    AlreadyExists,
}

/// A remote calendar accepting creates keyed by the descriptor's own id.
///
/// Implementations translate their duplicate-id rejection (HTTP 409 for
/// Google) into `AlreadyExists`; everything else unrecoverable becomes
/// `ScheduleError::Sink`.
#[async_trait]
pub trait CalendarSink {
    async fn create_event(
        &self,
        calendar_id: &str,
        event: &EventDescriptor,
    ) -> ScheduleResult<CreateOutcome>;
}
