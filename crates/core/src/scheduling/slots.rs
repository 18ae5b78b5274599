//! Alternative-slot finder
//!
//! Greedy interval-gap scan: merge overlapping events into busy blocks,
//! compute the free gaps inside the horizon, enumerate candidate windows of
//! the requested duration, and rank them by proximity to the original
//! request. Pure function of its inputs.

use chrono::Duration;
use chrono_tz::Tz;
use slotwise_domain::{
    AlternativeSlot, BusinessHours, CalendarEvent, Result, SearchConfig, SlotwiseError,
    TimeInterval,
};

/// Knobs for one slot search, derived from [`SearchConfig`].
#[derive(Debug, Clone)]
pub struct SlotSearchOptions {
    /// Candidate enumeration stride (clamped to the requested duration).
    pub step: Duration,
    /// Hard bound on the horizon span.
    pub max_horizon: Duration,
    /// Optional local-time window candidates must start within.
    pub business_hours: Option<BusinessHours>,
    /// Timezone used to evaluate `business_hours`.
    pub timezone: Tz,
}

impl SlotSearchOptions {
    /// Build options from the scheduler's search configuration.
    #[must_use]
    pub fn from_config(search: &SearchConfig, timezone: Tz) -> Self {
        Self {
            step: Duration::minutes(search.slot_step_minutes.max(1)),
            max_horizon: Duration::hours(search.max_horizon_hours),
            business_hours: search.business_hours,
            timezone,
        }
    }
}

/// Reject horizons wider than the configured hard bound.
///
/// Keeps repository queries bounded and guarantees the scan terminates.
pub fn ensure_bounded(horizon: &TimeInterval, max_horizon: Duration) -> Result<()> {
    if horizon.duration() > max_horizon {
        return Err(SlotwiseError::InvalidRequest(format!(
            "search horizon of {}h exceeds the {}h bound",
            horizon.duration().num_hours(),
            max_horizon.num_hours()
        )));
    }
    Ok(())
}

/// Find free slots of `duration` inside `horizon`, nearest to `request`
/// first.
///
/// Candidates are enumerated from each free gap's start, sliding forward in
/// steps of `min(step, duration)` so large gaps yield several options, and
/// ranked by `|candidate.start - request.start|` with earlier starts
/// breaking ties. At most `max_results` slots are returned; an empty result
/// means no gap admits the duration anywhere in the horizon.
pub fn find_alternatives(
    request: &TimeInterval,
    duration: Duration,
    horizon: &TimeInterval,
    events: &[CalendarEvent],
    max_results: usize,
    options: &SlotSearchOptions,
) -> Result<Vec<AlternativeSlot>> {
    ensure_bounded(horizon, options.max_horizon)?;
    if duration <= Duration::zero() {
        return Err(SlotwiseError::InvalidRequest(
            "slot duration must be positive".to_string(),
        ));
    }

    let step = options.step.min(duration);
    let blocks = merge_busy_blocks(events);
    let mut candidates = Vec::new();

    for gap in free_gaps(&blocks, horizon) {
        let mut start = gap.start;
        while start.checked_add_signed(duration).is_some_and(|end| end <= gap.end) {
            let candidate = TimeInterval::with_duration(start, duration)?;
            if starts_within_business_hours(&candidate, options) {
                candidates.push(AlternativeSlot {
                    interval: candidate,
                    distance_from_request: (start - request.start).num_seconds(),
                });
            }
            start += step;
        }
    }

    candidates.sort_by(|a, b| {
        a.distance_from_request
            .abs()
            .cmp(&b.distance_from_request.abs())
            .then_with(|| a.interval.start.cmp(&b.interval.start))
    });
    candidates.truncate(max_results);

    Ok(candidates)
}

/// Merge strictly-overlapping events into busy blocks, sorted by start.
///
/// Back-to-back events stay separate per the half-open rule; the zero-width
/// gap between them admits no candidate, so results are unaffected.
fn merge_busy_blocks(events: &[CalendarEvent]) -> Vec<TimeInterval> {
    let mut intervals: Vec<TimeInterval> = events.iter().map(|e| e.interval).collect();
    intervals.sort_by_key(|iv| iv.start);

    let mut blocks: Vec<TimeInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match blocks.last_mut() {
            Some(last) if interval.start < last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => blocks.push(interval),
        }
    }
    blocks
}

/// Free gaps between busy blocks inside `horizon`, including the gap before
/// the first block and after the last. An empty block list yields the whole
/// horizon as one gap.
fn free_gaps(blocks: &[TimeInterval], horizon: &TimeInterval) -> Vec<TimeInterval> {
    let mut gaps = Vec::new();
    let mut cursor = horizon.start;

    for block in blocks {
        if block.end <= cursor {
            continue;
        }
        if block.start >= horizon.end {
            break;
        }
        if let Ok(gap) = TimeInterval::new(cursor, block.start.min(horizon.end)) {
            gaps.push(gap);
        }
        cursor = cursor.max(block.end);
    }

    // Degenerate tails (cursor at or past the horizon end) fail validation
    // and are simply not gaps.
    if let Ok(tail) = TimeInterval::new(cursor, horizon.end) {
        gaps.push(tail);
    }

    gaps
}

fn starts_within_business_hours(candidate: &TimeInterval, options: &SlotSearchOptions) -> bool {
    let Some(hours) = options.business_hours else {
        return true;
    };
    let local = candidate.start.with_timezone(&options.timezone).time();
    hours.start <= local && local < hours.end
}
