//! Scheduling port interfaces
//!
//! The core reaches the outside world only through these traits. Adapters
//! live in `slotwise-infra`; tests substitute in-memory mocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotwise_domain::{CalendarEvent, Result, SlotRequest, TimeInterval};

/// Trait for calendar backend operations
///
/// The adapter owns all durable event data; the core only holds read
/// snapshots for the lifetime of one resolution call. Implementations are
/// expected to return events ordered by start time and to surface transient
/// failures as [`slotwise_domain::SlotwiseError::RepositoryUnavailable`].
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// List events intersecting `[window_start, window_end)`.
    async fn list_events(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>>;

    /// Insert a new event and return the backend-assigned event id.
    ///
    /// May fail with `RepositoryUnavailable` or, where the backend detects
    /// it, `Conflict`.
    async fn insert_event(&self, interval: TimeInterval, title: &str) -> Result<String>;
}

/// Contract for the upstream natural-language time parser
///
/// The workflow never sees raw utterances; the calling layer resolves
/// "tomorrow afternoon" or "1 hour after my interview" into a structured
/// [`SlotRequest`] behind this trait. Implementations are swappable and out
/// of scope for the core; a failed parse is
/// [`slotwise_domain::SlotwiseError::InvalidRequest`].
pub trait SlotRequestParser: Send + Sync {
    /// Parse an utterance into a structured request, relative to `now`.
    fn parse(&self, utterance: &str, now: DateTime<Utc>) -> Result<SlotRequest>;
}
