//! Availability checker
//!
//! A pure function of its inputs: no clock reads, no I/O, no side effects.
//! Safe for unlimited parallel invocation.

use slotwise_domain::{AvailabilityResult, CalendarEvent, TimeInterval};

use crate::time::overlaps;

/// Check whether `request` overlaps any existing event.
///
/// Returns [`AvailabilityResult::Available`] when no event conflicts,
/// otherwise [`AvailabilityResult::Busy`] with the conflicting events
/// sorted by start time ascending, ties broken by event id lexicographically
/// so results are deterministic.
#[must_use]
pub fn check(request: &TimeInterval, events: &[CalendarEvent]) -> AvailabilityResult {
    let mut conflicting: Vec<CalendarEvent> = events
        .iter()
        .filter(|event| overlaps(request, &event.interval))
        .cloned()
        .collect();

    if conflicting.is_empty() {
        return AvailabilityResult::Available { interval: *request };
    }

    conflicting.sort_by(|a, b| {
        a.interval.start.cmp(&b.interval.start).then_with(|| a.id.cmp(&b.id))
    });

    AvailabilityResult::Busy { conflicting }
}
