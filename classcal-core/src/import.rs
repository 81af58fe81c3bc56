//! Sequential import of schedule rows into a calendar sink.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::event::build_event;
use crate::row::ScheduleRow;
use crate::sink::{CalendarSink, CreateOutcome};
use crate::term::TermWindow;

/// Per-row result, in input order. `row` is the 1-based position in the
/// source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Created { row: usize, summary: String },
    /// The sink already had an event with this id (re-import path).
    AlreadyExists { row: usize, summary: String },
    /// The row couldn't be built into an event (bad day name or time).
    Skipped { row: usize, reason: String },
    /// The sink rejected the submission.
    Failed { row: usize, reason: String },
}

/// Aggregated result of one import run.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub created: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub failed: usize,
    /// One entry per processed row, in input order.
    pub outcomes: Vec<RowOutcome>,
    /// Set when the cancel flag stopped the batch before the last row.
    pub cancelled: bool,
}

impl ImportReport {
    /// Reasons for rows that didn't produce a created or duplicate event.
    pub fn failure_reasons(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                RowOutcome::Skipped { reason, .. } | RowOutcome::Failed { reason, .. } => {
                    Some(reason.as_str())
                }
                _ => None,
            })
            .collect()
    }
}

/// Submits schedule rows to a sink one at a time, strictly in input order.
///
/// Row-scoped build failures and sink errors are recorded and the batch
/// continues; nothing short of cancellation stops the loop. There is no
/// rollback: events created before a later failure stay in the sink.
pub struct Importer<'a, S: CalendarSink> {
    sink: &'a S,
    term: &'a TermWindow,
    calendar_id: &'a str,
    cancel: Arc<AtomicBool>,
}

impl<'a, S: CalendarSink> Importer<'a, S> {
    pub fn new(sink: &'a S, term: &'a TermWindow, calendar_id: &'a str) -> Self {
        Importer {
            sink,
            term,
            calendar_id,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle that stops the batch between rows when set. Each row's
    /// submission is self-contained, so cancellation never leaves a
    /// half-submitted event.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub async fn run(&self, rows: &[ScheduleRow]) -> ImportReport {
        let mut report = ImportReport::default();

        for (index, row) in rows.iter().enumerate() {
            if self.cancel.load(Ordering::Relaxed) {
                report.cancelled = true;
                break;
            }

            let row_number = index + 1;

            let event = match build_event(row, self.term) {
                Ok(event) => event,
                Err(err) => {
                    report.skipped += 1;
                    report.outcomes.push(RowOutcome::Skipped {
                        row: row_number,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            match self.sink.create_event(self.calendar_id, &event).await {
                Ok(CreateOutcome::Created) => {
                    report.created += 1;
                    report.outcomes.push(RowOutcome::Created {
                        row: row_number,
                        summary: event.summary,
                    });
                }
                Ok(CreateOutcome::AlreadyExists) => {
                    report.duplicates += 1;
                    report.outcomes.push(RowOutcome::AlreadyExists {
                        row: row_number,
                        summary: event.summary,
                    });
                }
                Err(err) => {
                    report.failed += 1;
                    report.outcomes.push(RowOutcome::Failed {
                        row: row_number,
                        reason: err.to_string(),
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ScheduleError, ScheduleResult};
    use crate::event::EventDescriptor;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory sink remembering ids it has seen, like the real calendar.
    #[derive(Default)]
    struct MockSink {
        seen: Mutex<HashSet<String>>,
        /// Summaries the sink should reject with an error.
        reject: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CalendarSink for MockSink {
        async fn create_event(
            &self,
            _calendar_id: &str,
            event: &EventDescriptor,
        ) -> ScheduleResult<CreateOutcome> {
            self.calls.lock().unwrap().push(event.summary.clone());

            if self.reject.iter().any(|s| event.summary.contains(s)) {
                return Err(ScheduleError::Sink("backend unavailable".to_string()));
            }

            if self.seen.lock().unwrap().insert(event.id.clone()) {
                Ok(CreateOutcome::Created)
            } else {
                Ok(CreateOutcome::AlreadyExists)
            }
        }
    }

    fn term() -> TermWindow {
        TermWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
            "America/Toronto",
        )
        .unwrap()
    }

    fn make_row(code: &str, day: &str) -> ScheduleRow {
        ScheduleRow {
            course_name: format!("Course {}", code),
            course_code: code.to_string(),
            day: day.to_string(),
            start_time: "10:00 AM".to_string(),
            end_time: "11:00 AM".to_string(),
            location: "Hall A".to_string(),
        }
    }

    #[tokio::test]
    async fn bad_row_skipped_rest_unaffected() {
        let rows = vec![
            make_row("CS101", "Monday"),
            make_row("CS102", "Tuesday"),
            make_row("CS103", "Funday"),
            make_row("CS104", "Thursday"),
            make_row("CS105", "Friday"),
        ];

        let sink = MockSink::default();
        let term = term();
        let importer = Importer::new(&sink, &term, "primary");
        let report = importer.run(&rows).await;

        assert_eq!(report.created, 4);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 0);
        assert!(matches!(
            report.outcomes[2],
            RowOutcome::Skipped { row: 3, .. }
        ));

        // The sink saw the four good rows, in input order
        let calls = sink.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                "CS101 – Course CS101 (Lecture)",
                "CS102 – Course CS102 (Lecture)",
                "CS104 – Course CS104 (Lecture)",
                "CS105 – Course CS105 (Lecture)",
            ]
        );
    }

    #[tokio::test]
    async fn second_run_is_all_duplicates() {
        let rows = vec![make_row("CS101", "Monday"), make_row("CS102", "Tuesday")];

        let sink = MockSink::default();
        let term = term();
        let importer = Importer::new(&sink, &term, "primary");

        let first = importer.run(&rows).await;
        assert_eq!(first.created, 2);
        assert_eq!(first.duplicates, 0);

        let second = importer.run(&rows).await;
        assert_eq!(second.created, 0);
        assert_eq!(second.duplicates, 2);
        assert_eq!(second.failed, 0);
    }

    #[tokio::test]
    async fn sink_error_marks_row_failed_and_continues() {
        let rows = vec![
            make_row("CS101", "Monday"),
            make_row("CS102", "Tuesday"),
            make_row("CS103", "Wednesday"),
        ];

        let sink = MockSink {
            reject: vec!["CS102".to_string()],
            ..MockSink::default()
        };
        let term = term();
        let importer = Importer::new(&sink, &term, "primary");
        let report = importer.run(&rows).await;

        assert_eq!(report.created, 2);
        assert_eq!(report.failed, 1);
        assert!(matches!(
            report.outcomes[1],
            RowOutcome::Failed { row: 2, .. }
        ));
        assert_eq!(report.failure_reasons().len(), 1);
    }

    #[tokio::test]
    async fn cancel_flag_stops_between_rows() {
        let rows = vec![make_row("CS101", "Monday"), make_row("CS102", "Tuesday")];

        let sink = MockSink::default();
        let term = term();
        let importer = Importer::new(&sink, &term, "primary");
        importer.cancel_flag().store(true, Ordering::Relaxed);

        let report = importer.run(&rows).await;
        assert!(report.cancelled);
        assert_eq!(report.created, 0);
        assert!(sink.calls.lock().unwrap().is_empty());
    }
}
