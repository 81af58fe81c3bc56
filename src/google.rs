//! Google Calendar implementation of the calendar sink.
//!
//! Events are inserted with a caller-supplied id, so a re-import of the
//! same schedule hits Google's duplicate-id rejection (HTTP 409) instead
//! of creating a second copy. 409 is translated to `AlreadyExists`;
//! transient rejections (429 and 5xx) get a short bounded retry.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

use classcal_core::{CalendarSink, CreateOutcome, EventDescriptor, ScheduleError, ScheduleResult};

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Attempts per event beyond the first, for 429/5xx responses only.
const MAX_RETRIES: u32 = 2;
const RETRY_DELAY_MS: u64 = 500;

pub struct GoogleSink {
    client: reqwest::Client,
    access_token: String,
}

impl GoogleSink {
    pub fn new(access_token: String) -> Self {
        GoogleSink {
            client: reqwest::Client::new(),
            access_token,
        }
    }

    async fn insert(
        &self,
        calendar_id: &str,
        event: &EventDescriptor,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let url = format!("{}/calendars/{}/events", API_BASE, calendar_id);

        self.client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&event_body(event))
            .send()
            .await
    }
}

#[async_trait]
impl CalendarSink for GoogleSink {
    async fn create_event(
        &self,
        calendar_id: &str,
        event: &EventDescriptor,
    ) -> ScheduleResult<CreateOutcome> {
        let mut attempt = 0;

        loop {
            let response = self
                .insert(calendar_id, event)
                .await
                .map_err(|e| ScheduleError::Sink(format!("request failed: {}", e)))?;

            let status = response.status();

            if status.is_success() {
                return Ok(CreateOutcome::Created);
            }

            if status == StatusCode::CONFLICT {
                return Ok(CreateOutcome::AlreadyExists);
            }

            let transient = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if transient && attempt < MAX_RETRIES {
                attempt += 1;
                log::debug!(
                    "transient {} from calendar API, retry {}/{}",
                    status,
                    attempt,
                    MAX_RETRIES
                );
                tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt)))
                    .await;
                continue;
            }

            let detail = response.text().await.unwrap_or_default();
            return Err(ScheduleError::Sink(format!("HTTP {}: {}", status, detail)));
        }
    }
}

/// JSON body for the events.insert call.
fn event_body(event: &EventDescriptor) -> serde_json::Value {
    serde_json::json!({
        "id": event.id,
        "summary": event.summary,
        "location": event.location,
        "description": event.description,
        "start": {
            "dateTime": event.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "timeZone": event.timezone,
        },
        "end": {
            "dateTime": event.end.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "timeZone": event.timezone,
        },
        "recurrence": event.recurrence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn body_matches_calendar_api_shape() {
        let event = EventDescriptor {
            id: "cls0123456789abcdef0123".to_string(),
            summary: "CS201 – Data Structures (Lecture)".to_string(),
            description: "Session: Lecture\nCourse: Data Structures".to_string(),
            location: "Room 204".to_string(),
            start: NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(11, 30, 0)
                .unwrap(),
            timezone: "America/Toronto".to_string(),
            recurrence: vec!["RRULE:FREQ=WEEKLY;UNTIL=20240406T000000Z".to_string()],
        };

        let body = event_body(&event);

        assert_eq!(body["id"], "cls0123456789abcdef0123");
        assert_eq!(body["start"]["dateTime"], "2024-01-10T10:00:00");
        assert_eq!(body["start"]["timeZone"], "America/Toronto");
        assert_eq!(body["end"]["dateTime"], "2024-01-10T11:30:00");
        assert_eq!(
            body["recurrence"][0],
            "RRULE:FREQ=WEEKLY;UNTIL=20240406T000000Z"
        );
    }
}
