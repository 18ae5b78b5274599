//! Google Calendar event repository adapter
//!
//! Implements the core `EventRepository` port against the Google Calendar
//! v3 REST API. Credentials are supplied by an [`AccessTokenProvider`];
//! token acquisition and refresh live with the caller, not here.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use slotwise_core::EventRepository;
use slotwise_domain::{CalendarEvent, Result, SlotwiseError, TimeInterval};
use tracing::{debug, instrument, warn};

use crate::errors::InfraError;

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Transport timeout for a single calendar API request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Supplies a bearer token for calendar API calls.
///
/// OAuth flows and refresh logic are out of scope for the adapter; wire in
/// whatever credential machinery the host application uses.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Return a currently-valid access token.
    async fn access_token(&self) -> Result<String>;
}

/// Token provider backed by a fixed token (service accounts, tests).
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wrap a pre-acquired token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Google Calendar implementation of the `EventRepository` port.
pub struct GoogleCalendarRepository {
    http: Client,
    api_base: String,
    calendar_id: String,
    timezone: Tz,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl GoogleCalendarRepository {
    /// Create an adapter for one calendar.
    pub fn new(
        calendar_id: impl Into<String>,
        timezone: Tz,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self> {
        let http = Client::builder().timeout(HTTP_TIMEOUT).build().map_err(|e| {
            SlotwiseError::Config(format!("failed to build http client: {e}"))
        })?;

        Ok(Self {
            http,
            api_base: GOOGLE_CALENDAR_API_BASE.to_string(),
            calendar_id: calendar_id.into(),
            timezone,
            tokens,
        })
    }

    /// Override the API base URL (tests point this at a stub server).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.api_base, self.calendar_id)
    }

    /// Convert one raw API item into a domain event, keeping the payload
    /// opaque in `raw`.
    fn to_domain_event(&self, item: serde_json::Value) -> Result<CalendarEvent> {
        let parsed: GoogleCalendarEvent =
            serde_json::from_value(item.clone()).map_err(|e| {
                SlotwiseError::RepositoryUnavailable(format!("malformed event payload: {e}"))
            })?;

        let start = self.boundary_instant(&parsed.start)?;
        let end = self.boundary_instant(&parsed.end)?;
        let interval = TimeInterval::new(start, end)?;

        let title = parsed
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "(no title)".to_string());

        Ok(CalendarEvent { id: parsed.id, title, interval, raw: item })
    }

    /// Resolve a Google event boundary to a UTC instant.
    ///
    /// Timed events carry an RFC 3339 `dateTime`. All-day events carry a
    /// bare `date`, interpreted as local midnight in the configured
    /// timezone (Google's all-day end date is already exclusive, so both
    /// boundaries widen the same way).
    fn boundary_instant(&self, boundary: &EventDateTime) -> Result<DateTime<Utc>> {
        if let Some(date_time) = &boundary.date_time {
            return DateTime::parse_from_rfc3339(date_time)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    SlotwiseError::RepositoryUnavailable(format!(
                        "invalid event dateTime {date_time:?}: {e}"
                    ))
                });
        }

        let Some(date) = &boundary.date else {
            return Err(SlotwiseError::RepositoryUnavailable(
                "event boundary carries neither dateTime nor date".to_string(),
            ));
        };

        let naive = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| {
                SlotwiseError::RepositoryUnavailable(format!("invalid event date {date:?}: {e}"))
            })?
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| {
                SlotwiseError::RepositoryUnavailable(format!("no midnight for date {date:?}"))
            })?;

        self.timezone
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| {
                SlotwiseError::RepositoryUnavailable(format!(
                    "no valid local midnight for {date:?} in {}",
                    self.timezone
                ))
            })
    }
}

#[async_trait]
impl EventRepository for GoogleCalendarRepository {
    #[instrument(skip(self))]
    async fn list_events(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        let token = self.tokens.access_token().await?;
        let query = [
            ("timeMin", window_start.to_rfc3339()),
            ("timeMax", window_end.to_rfc3339()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];

        debug!(calendar_id = %self.calendar_id, "listing calendar events");

        let response = self
            .http
            .get(self.events_url())
            .bearer_auth(&token)
            .query(&query)
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(InfraError(SlotwiseError::RepositoryUnavailable(format!(
                "calendar API error ({status}): {body}"
            )))
            .into());
        }

        let payload: GoogleEventsResponse =
            response.json().await.map_err(InfraError::from)?;

        let mut events = Vec::with_capacity(payload.items.len());
        for item in payload.items {
            match self.to_domain_event(item) {
                Ok(event) => events.push(event),
                Err(err) => warn!(error = %err, "skipping unusable calendar event"),
            }
        }
        events.sort_by(|a, b| {
            a.interval.start.cmp(&b.interval.start).then_with(|| a.id.cmp(&b.id))
        });

        Ok(events)
    }

    #[instrument(skip(self, title))]
    async fn insert_event(&self, interval: TimeInterval, title: &str) -> Result<String> {
        let token = self.tokens.access_token().await?;
        let body = serde_json::json!({
            "summary": title,
            "start": {
                "dateTime": interval.start.to_rfc3339(),
                "timeZone": self.timezone.name(),
            },
            "end": {
                "dateTime": interval.end.to_rfc3339(),
                "timeZone": self.timezone.name(),
            },
        });

        debug!(calendar_id = %self.calendar_id, start = %interval.start, "inserting calendar event");

        let response = self
            .http
            .post(self.events_url())
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(InfraError::from)?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(SlotwiseError::Conflict(format!(
                "calendar backend rejected the insert: {body}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(InfraError(SlotwiseError::RepositoryUnavailable(format!(
                "calendar API error ({status}): {body}"
            )))
            .into());
        }

        let created: GoogleInsertResponse =
            response.json().await.map_err(InfraError::from)?;
        Ok(created.id)
    }
}

#[derive(Debug, Deserialize)]
struct GoogleEventsResponse {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GoogleCalendarEvent {
    id: String,
    summary: Option<String>,
    start: EventDateTime,
    end: EventDateTime,
}

#[derive(Debug, Deserialize)]
struct EventDateTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleInsertResponse {
    id: String,
}
