//! Domain types for availability resolution
//!
//! All values are immutable snapshots produced fresh per request; nothing in
//! this module holds shared mutable state. Instants are stored as
//! `DateTime<Utc>` (the canonical comparison timezone) and serialize as
//! RFC 3339 with an explicit offset.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SlotwiseError};

/// Half-open time interval `[start, end)`.
///
/// The constructor enforces `start < end`; zero- and negative-duration
/// intervals are rejected with [`SlotwiseError::InvalidRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    /// Inclusive start instant.
    pub start: DateTime<Utc>,
    /// Exclusive end instant.
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// Create a validated interval.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(SlotwiseError::InvalidRequest(format!(
                "interval start ({start}) must precede end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Create an interval from a start instant and a positive duration.
    pub fn with_duration(start: DateTime<Utc>, duration: Duration) -> Result<Self> {
        let end = start.checked_add_signed(duration).ok_or_else(|| {
            SlotwiseError::InvalidRequest(format!(
                "interval starting at {start} with duration {}s exceeds the supported time range",
                duration.num_seconds()
            ))
        })?;
        Self::new(start, end)
    }

    /// Length of the interval.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `other` lies entirely inside this interval.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Calendar event snapshot as returned by the event repository.
///
/// The core never mutates events; it only reads `interval`. `raw` carries
/// the provider's original payload for callers that need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Opaque provider-assigned identifier.
    pub id: String,
    /// Event title (provider "summary").
    pub title: String,
    /// Occupied time interval.
    pub interval: TimeInterval,
    /// Opaque provider payload, untouched by the core.
    #[serde(default)]
    pub raw: serde_json::Value,
}

/// Meeting duration as it crosses the tool boundary.
///
/// Either integer seconds or a structured `{hours, minutes}` pair — never an
/// ambiguous bare number of unspecified unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationSpec {
    /// Duration in whole seconds.
    Seconds(i64),
    /// Duration as an hours/minutes pair.
    HoursMinutes {
        /// Whole hours component.
        hours: i64,
        /// Whole minutes component.
        minutes: i64,
    },
}

impl DurationSpec {
    /// Convenience constructor for whole minutes.
    #[must_use]
    pub fn from_minutes(minutes: i64) -> Self {
        Self::Seconds(minutes.saturating_mul(60))
    }

    /// Resolve to a concrete duration, rejecting non-positive and
    /// out-of-range spans.
    ///
    /// Values are caller-supplied, so overflow is an `InvalidRequest`, not
    /// a panic.
    pub fn to_duration(self) -> Result<Duration> {
        let seconds = match self {
            Self::Seconds(s) => Some(s),
            Self::HoursMinutes { hours, minutes } => hours
                .checked_mul(3600)
                .zip(minutes.checked_mul(60))
                .and_then(|(h, m)| h.checked_add(m)),
        };
        match seconds {
            Some(s) if s > 0 => Duration::try_seconds(s).ok_or_else(|| {
                SlotwiseError::InvalidRequest(format!("duration of {s}s is out of range"))
            }),
            Some(s) => Err(SlotwiseError::InvalidRequest(format!(
                "duration must be positive, got {s}s"
            ))),
            None => Err(SlotwiseError::InvalidRequest(
                "duration overflows the supported range".to_string(),
            )),
        }
    }
}

/// Which boundary of the anchor event a relative offset is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    /// Offset from the anchor event's end ("1 hour after my interview").
    #[default]
    FromEnd,
    /// Offset from the anchor event's start.
    FromStart,
}

/// Reference to an existing event for relative requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorSpec {
    /// Id of the pre-existing calendar event used as the reference.
    pub event_id: String,
    /// Boundary the offset is measured from.
    #[serde(default)]
    pub mode: AnchorMode,
    /// Signed offset in seconds from the chosen boundary.
    #[serde(default)]
    pub offset_seconds: i64,
}

/// A request for a meeting slot within a bounded search window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequest {
    /// Requested meeting length.
    pub duration: DurationSpec,
    /// Earliest acceptable start (also the requested start when unanchored).
    pub earliest: DateTime<Utc>,
    /// Search horizon end.
    pub latest: DateTime<Utc>,
    /// Optional anchor for relative requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AnchorSpec>,
}

impl SlotRequest {
    /// Validate the request invariants and return the resolved duration.
    ///
    /// Invariants: `earliest < latest`, positive duration, and
    /// `duration <= latest - earliest`. Violations are `InvalidRequest`
    /// and are reported before any repository I/O.
    pub fn validate(&self) -> Result<Duration> {
        let duration = self.duration.to_duration()?;
        if self.earliest >= self.latest {
            return Err(SlotwiseError::InvalidRequest(format!(
                "earliest ({}) must precede latest ({})",
                self.earliest, self.latest
            )));
        }
        if duration > self.latest - self.earliest {
            return Err(SlotwiseError::InvalidRequest(format!(
                "duration ({}s) exceeds the search window ({}s)",
                duration.num_seconds(),
                (self.latest - self.earliest).num_seconds()
            )));
        }
        Ok(duration)
    }
}

/// Outcome of checking one interval against existing events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AvailabilityResult {
    /// The requested interval is free.
    Available {
        /// The interval that was checked.
        interval: TimeInterval,
    },
    /// The requested interval overlaps existing events.
    Busy {
        /// Conflicting events, sorted by start time (ties by id).
        conflicting: Vec<CalendarEvent>,
    },
}

impl AvailabilityResult {
    /// Whether the checked interval was free.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

/// A free slot proposed as an alternative to a busy request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeSlot {
    /// The proposed free interval.
    pub interval: TimeInterval,
    /// `candidate.start - requested.start` in seconds; ranking key.
    pub distance_from_request: i64,
}

/// Terminal result of one resolution workflow invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum ResolutionDecision {
    /// The requested slot is free and can be confirmed into a booking.
    Confirmed {
        /// The free interval.
        interval: TimeInterval,
    },
    /// The requested slot is busy; nearby free slots are proposed.
    Suggested {
        /// Ranked alternatives, nearest first.
        alternatives: Vec<AlternativeSlot>,
    },
    /// No free slot of the requested duration exists within the horizon.
    NoneFound,
}

/// Successful booking outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResult {
    /// Repository-assigned id of the created event.
    pub event_id: String,
    /// The booked interval.
    pub interval: TimeInterval,
}

#[cfg(test)]
mod tests {
    //! Unit tests for domain types.
    use chrono::TimeZone;

    use super::*;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, h, m, 0).unwrap()
    }

    /// Validates `TimeInterval::new` invariant enforcement.
    ///
    /// Assertions:
    /// - Ensures a forward interval constructs successfully.
    /// - Ensures zero-duration and inverted intervals are rejected with
    ///   `InvalidRequest`.
    #[test]
    fn test_interval_rejects_non_positive_duration() {
        assert!(TimeInterval::new(ts(14, 0), ts(15, 0)).is_ok());

        let zero = TimeInterval::new(ts(14, 0), ts(14, 0));
        assert!(matches!(zero, Err(SlotwiseError::InvalidRequest(_))));

        let inverted = TimeInterval::new(ts(15, 0), ts(14, 0));
        assert!(matches!(inverted, Err(SlotwiseError::InvalidRequest(_))));
    }

    /// Validates `DurationSpec` boundary representations.
    ///
    /// Assertions:
    /// - Confirms bare seconds and `{hours, minutes}` deserialize to the
    ///   same duration.
    /// - Ensures non-positive durations are rejected.
    #[test]
    fn test_duration_spec_forms() {
        let seconds: DurationSpec = serde_json::from_str("5400").unwrap();
        let pair: DurationSpec = serde_json::from_str(r#"{"hours":1,"minutes":30}"#).unwrap();

        assert_eq!(seconds.to_duration().unwrap(), Duration::minutes(90));
        assert_eq!(pair.to_duration().unwrap(), Duration::minutes(90));

        assert!(DurationSpec::Seconds(0).to_duration().is_err());
        assert!(DurationSpec::HoursMinutes { hours: 0, minutes: -15 }.to_duration().is_err());
    }

    /// Validates rejection of extreme but well-formed duration payloads.
    ///
    /// Assertions:
    /// - Ensures a second count beyond the representable range returns
    ///   `InvalidRequest` instead of panicking.
    /// - Ensures an overflowing hours/minutes pair is rejected the same
    ///   way, including when it arrives via deserialization.
    #[test]
    fn test_duration_spec_extremes_rejected() {
        let huge = DurationSpec::Seconds(i64::MAX).to_duration();
        assert!(matches!(huge, Err(SlotwiseError::InvalidRequest(_))));

        let overflow = DurationSpec::HoursMinutes { hours: i64::MAX, minutes: 1 }.to_duration();
        assert!(matches!(overflow, Err(SlotwiseError::InvalidRequest(_))));

        let wire: DurationSpec = serde_json::from_str("9223372036854775807").unwrap();
        assert!(matches!(wire.to_duration(), Err(SlotwiseError::InvalidRequest(_))));
    }

    /// Validates `SlotRequest::validate` invariants.
    ///
    /// Assertions:
    /// - Ensures an inverted window is rejected.
    /// - Ensures a duration longer than the window is rejected.
    /// - Confirms a well-formed request resolves its duration.
    #[test]
    fn test_slot_request_validation() {
        let inverted = SlotRequest {
            duration: DurationSpec::from_minutes(30),
            earliest: ts(17, 0),
            latest: ts(9, 0),
            anchor: None,
        };
        assert!(matches!(inverted.validate(), Err(SlotwiseError::InvalidRequest(_))));

        let too_long = SlotRequest {
            duration: DurationSpec::Seconds(3 * 3600),
            earliest: ts(14, 0),
            latest: ts(15, 0),
            anchor: None,
        };
        assert!(matches!(too_long.validate(), Err(SlotwiseError::InvalidRequest(_))));

        let ok = SlotRequest {
            duration: DurationSpec::from_minutes(30),
            earliest: ts(9, 0),
            latest: ts(17, 0),
            anchor: None,
        };
        assert_eq!(ok.validate().unwrap(), Duration::minutes(30));
    }

    /// Validates the serialized shape of `ResolutionDecision`.
    ///
    /// Assertions:
    /// - Confirms the `decision` tag and camelCase variant names.
    #[test]
    fn test_decision_serialization() {
        let none = serde_json::to_value(&ResolutionDecision::NoneFound).unwrap();
        assert_eq!(none["decision"], "noneFound");

        let confirmed = ResolutionDecision::Confirmed {
            interval: TimeInterval::new(ts(14, 0), ts(15, 0)).unwrap(),
        };
        let json = serde_json::to_value(&confirmed).unwrap();
        assert_eq!(json["decision"], "confirmed");
        assert!(json["interval"]["start"].as_str().unwrap().contains("2026-03-10T14:00:00"));
    }
}
