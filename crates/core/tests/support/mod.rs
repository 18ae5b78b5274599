//! Shared test helpers for `slotwise-core` integration tests.
//!
//! These helpers provide reusable fixtures and a lightweight in-memory
//! repository so the workflow tests can focus on behaviour instead of
//! boilerplate.

pub mod repository;

use chrono::{DateTime, TimeZone, Utc};
use slotwise_domain::{CalendarEvent, TimeInterval};

/// Timestamp on the fixed test day (2026-03-10, UTC).
pub fn ts(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, h, m, 0).unwrap()
}

/// Validated interval on the fixed test day.
pub fn iv(sh: u32, sm: u32, eh: u32, em: u32) -> TimeInterval {
    TimeInterval::new(ts(sh, sm), ts(eh, em)).unwrap()
}

/// Calendar event fixture with a deterministic id.
pub fn event(id: &str, interval: TimeInterval) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        title: format!("Event {id}"),
        interval,
        raw: serde_json::Value::Null,
    }
}
