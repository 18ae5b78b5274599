//! In-memory mock for `EventRepository`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotwise_core::EventRepository;
use slotwise_domain::{CalendarEvent, Result, SlotwiseError, TimeInterval};

/// In-memory `EventRepository` with failure and latency injection.
///
/// Stores events behind a mutex, answers `list_events` with the overlapping
/// subset sorted by start time, and assigns UUID ids on insert. Designed for
/// workflow tests where deterministic responses are required.
#[derive(Default, Clone)]
pub struct MockEventRepository {
    events: Arc<Mutex<Vec<CalendarEvent>>>,
    list_calls: Arc<AtomicUsize>,
    insert_calls: Arc<AtomicUsize>,
    failing_lists: Arc<AtomicUsize>,
    list_delay: Arc<Mutex<Option<Duration>>>,
}

impl MockEventRepository {
    /// Create a new mock seeded with the provided events.
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events: Arc::new(Mutex::new(events)), ..Self::default() }
    }

    /// Convenience helper for adding a single event to the mock.
    pub fn with_event(self, event: CalendarEvent) -> Self {
        self.events.lock().unwrap().push(event);
        self
    }

    /// Make the next `n` list calls fail with `RepositoryUnavailable`.
    pub fn fail_next_lists(&self, n: usize) {
        self.failing_lists.store(n, Ordering::SeqCst);
    }

    /// Delay every list call by `delay` (for timeout tests).
    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = Some(delay);
    }

    /// Number of `list_events` calls observed.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `insert_event` calls observed.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of the stored events.
    pub fn stored_events(&self) -> Vec<CalendarEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventRepository for MockEventRepository {
    async fn list_events(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self
            .failing_lists
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(SlotwiseError::RepositoryUnavailable(
                "injected list failure".to_string(),
            ));
        }

        let mut events: Vec<CalendarEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.interval.start < window_end && window_start < e.interval.end)
            .cloned()
            .collect();
        events.sort_by(|a, b| {
            a.interval.start.cmp(&b.interval.start).then_with(|| a.id.cmp(&b.id))
        });
        Ok(events)
    }

    async fn insert_event(&self, interval: TimeInterval, title: &str) -> Result<String> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        let id = uuid::Uuid::new_v4().to_string();
        self.events.lock().unwrap().push(CalendarEvent {
            id: id.clone(),
            title: title.to_string(),
            interval,
            raw: serde_json::Value::Null,
        });
        Ok(id)
    }
}
