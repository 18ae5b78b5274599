//! Half-open interval arithmetic and relative time resolution
//!
//! All comparisons happen on `DateTime<Utc>`, the canonical timezone;
//! timezone conversion is confined to [`day_bounds`], which needs the
//! configured local timezone to widen an instant to its calendar day.

use chrono::{DateTime, Days, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use slotwise_domain::{AnchorMode, CalendarEvent, Result, SlotwiseError, TimeInterval};

/// Whether two half-open intervals overlap.
///
/// True iff `a.start < b.end && b.start < a.end`. An event ending exactly
/// when another begins does not conflict.
#[must_use]
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.start < b.end && b.start < a.end
}

/// Smallest interval covering both inputs.
pub fn envelope(a: &TimeInterval, b: &TimeInterval) -> Result<TimeInterval> {
    TimeInterval::new(a.start.min(b.start), a.end.max(b.end))
}

/// Resolve a relative request ("1 hour after X") into a concrete interval.
///
/// The offset is measured from the anchor's end or start per `mode`. Fails
/// with [`SlotwiseError::InvalidReference`] when the anchor event is absent.
pub fn resolve_relative(
    anchor: Option<&CalendarEvent>,
    mode: AnchorMode,
    offset: Duration,
    duration: Duration,
) -> Result<TimeInterval> {
    let anchor = anchor.ok_or_else(|| {
        SlotwiseError::InvalidReference("anchor event not found in the search window".to_string())
    })?;

    let base = match mode {
        AnchorMode::FromEnd => anchor.interval.end,
        AnchorMode::FromStart => anchor.interval.start,
    };
    let start = base.checked_add_signed(offset).ok_or_else(|| {
        SlotwiseError::InvalidRequest(
            "anchor offset lands outside the supported time range".to_string(),
        )
    })?;

    TimeInterval::with_duration(start, duration)
}

/// The full local calendar day containing `instant`, expressed in UTC.
///
/// Used to widen event-fetch windows to day boundaries so a voice/UI caller
/// sees the whole day's context.
pub fn day_bounds(instant: DateTime<Utc>, tz: Tz) -> Result<TimeInterval> {
    let date = instant.with_timezone(&tz).date_naive();
    let next = date.checked_add_days(Days::new(1)).ok_or_else(|| {
        SlotwiseError::InvalidRequest(format!("date {date} is out of supported range"))
    })?;

    TimeInterval::new(local_midnight(date, tz)?, local_midnight(next, tz)?)
}

/// Local midnight of `date` in `tz`, as a UTC instant.
///
/// On DST transitions where midnight does not exist or is ambiguous, the
/// earliest valid local time is used.
fn local_midnight(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        SlotwiseError::InvalidRequest(format!("no midnight for date {date}"))
    })?;

    tz.from_local_datetime(&naive)
        .earliest()
        // DST gap at midnight: fall forward to the first valid instant
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| {
            SlotwiseError::InvalidRequest(format!("no valid local midnight for {date} in {tz}"))
        })
}

#[cfg(test)]
mod tests {
    //! Unit tests for time::interval.
    use chrono::TimeZone;

    use super::*;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, h, m, 0).unwrap()
    }

    fn iv(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeInterval {
        TimeInterval::new(start, end).unwrap()
    }

    fn event(id: &str, interval: TimeInterval) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: format!("Event {id}"),
            interval,
            raw: serde_json::Value::Null,
        }
    }

    /// Validates `overlaps` symmetry.
    ///
    /// Assertions:
    /// - Ensures `overlaps(a, b) == overlaps(b, a)` for overlapping and
    ///   disjoint pairs.
    #[test]
    fn test_overlap_symmetry() {
        let a = iv(ts(14, 0), ts(15, 0));
        let b = iv(ts(14, 30), ts(15, 30));
        let c = iv(ts(16, 0), ts(17, 0));

        assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        assert!(overlaps(&a, &b));

        assert_eq!(overlaps(&a, &c), overlaps(&c, &a));
        assert!(!overlaps(&a, &c));
    }

    /// Validates `overlaps` reflexivity for well-formed intervals.
    ///
    /// Assertions:
    /// - Ensures `overlaps(a, a)` evaluates to true.
    #[test]
    fn test_overlap_reflexive() {
        let a = iv(ts(14, 0), ts(15, 0));
        assert!(overlaps(&a, &a));
    }

    /// Validates the half-open rule for back-to-back intervals.
    ///
    /// Assertions:
    /// - Ensures an interval ending exactly when another begins does not
    ///   overlap it, in either order.
    #[test]
    fn test_back_to_back_never_overlaps() {
        let a = iv(ts(14, 0), ts(15, 0));
        let b = iv(ts(15, 0), ts(16, 0));

        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    /// Validates containment inside a fully-covering interval.
    ///
    /// Assertions:
    /// - Ensures a request strictly inside an event overlaps it.
    #[test]
    fn test_contained_interval_overlaps() {
        let event = iv(ts(14, 0), ts(15, 0));
        let request = iv(ts(14, 0), ts(14, 30));

        assert!(overlaps(&request, &event));
    }

    /// Validates `resolve_relative` for both anchor modes.
    ///
    /// Assertions:
    /// - Confirms `FromEnd` offsets from the anchor's end.
    /// - Confirms `FromStart` offsets from the anchor's start.
    /// - Ensures a missing anchor yields `InvalidReference`.
    #[test]
    fn test_resolve_relative() {
        let interview = event("interview", iv(ts(10, 0), ts(11, 0)));

        let after = resolve_relative(
            Some(&interview),
            AnchorMode::FromEnd,
            Duration::hours(1),
            Duration::minutes(30),
        )
        .unwrap();
        assert_eq!(after, iv(ts(12, 0), ts(12, 30)));

        let from_start = resolve_relative(
            Some(&interview),
            AnchorMode::FromStart,
            Duration::minutes(-30),
            Duration::minutes(30),
        )
        .unwrap();
        assert_eq!(from_start, iv(ts(9, 30), ts(10, 0)));

        let missing =
            resolve_relative(None, AnchorMode::FromEnd, Duration::zero(), Duration::minutes(30));
        assert!(matches!(missing, Err(SlotwiseError::InvalidReference(_))));
    }

    /// Validates overflow handling for extreme anchor offsets.
    ///
    /// Assertions:
    /// - Ensures an offset landing outside the representable time range
    ///   yields `InvalidRequest` instead of panicking.
    #[test]
    fn test_resolve_relative_extreme_offset() {
        let interview = event("interview", iv(ts(10, 0), ts(11, 0)));

        let out_of_range = resolve_relative(
            Some(&interview),
            AnchorMode::FromEnd,
            Duration::MAX,
            Duration::minutes(30),
        );
        assert!(matches!(out_of_range, Err(SlotwiseError::InvalidRequest(_))));
    }

    /// Validates `day_bounds` for a non-UTC timezone.
    ///
    /// Assertions:
    /// - Confirms the bounds span exactly one day.
    /// - Confirms the UTC instants correspond to local midnight (IST is
    ///   UTC+05:30, so local midnight is 18:30 UTC the previous day).
    #[test]
    fn test_day_bounds_kolkata() {
        let bounds = day_bounds(ts(14, 0), chrono_tz::Asia::Kolkata).unwrap();

        assert_eq!(bounds.duration(), Duration::days(1));
        assert_eq!(
            bounds.start,
            Utc.with_ymd_and_hms(2026, 3, 9, 18, 30, 0).unwrap()
        );
    }

    /// Validates `envelope` covering behavior.
    ///
    /// Assertions:
    /// - Confirms the envelope spans from the earliest start to the latest
    ///   end of the inputs.
    #[test]
    fn test_envelope() {
        let a = iv(ts(9, 0), ts(10, 0));
        let b = iv(ts(14, 0), ts(15, 0));

        assert_eq!(envelope(&a, &b).unwrap(), iv(ts(9, 0), ts(15, 0)));
        assert_eq!(envelope(&b, &a).unwrap(), iv(ts(9, 0), ts(15, 0)));
    }
}
