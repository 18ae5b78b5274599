//! Clock abstraction for testability
//!
//! Provides a trait-based approach to wall-clock reads that allows for
//! deterministic testing without relying on actual time passage. The domain
//! reasons in wall-clock time, so the trait hands out `DateTime<Utc>` and
//! timezone-normalized views rather than monotonic instants.
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use slotwise_core::time::{Clock, MockClock, SystemClock};
//!
//! // Use the system clock in production
//! let clock = SystemClock;
//! let _now = clock.now_utc();
//!
//! // Use a mock clock in tests
//! let mock = MockClock::new(Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap());
//! mock.advance(Duration::hours(2));
//! assert_eq!(mock.now_utc().format("%H:%M").to_string(), "11:00");
//! ```

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

/// Trait for wall-clock reads to enable testing
///
/// The sole time source the core consults; substituting [`MockClock`]
/// makes every "now"-relative computation deterministic.
pub trait Clock: Send + Sync {
    /// Current wall-clock time in the canonical timezone (UTC).
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current wall-clock time normalized to the given timezone.
    fn now_in(&self, tz: Tz) -> DateTime<Tz> {
        self.now_utc().with_timezone(&tz)
    }
}

/// Real system clock implementation
///
/// Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock clock for deterministic testing
///
/// Starts at a fixed instant and only moves when advanced manually.
/// Clones share the same underlying time.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a mock clock frozen at the given instant.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(now)) }
    }

    /// Advance the mock clock by a duration.
    pub fn advance(&self, duration: Duration) {
        // Test utility: panic on poisoned mutex to fail tests early
        let mut now = self.now.lock().expect("mutex poisoned");
        *now += duration;
    }

    /// Set the mock clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        // Test utility: panic on poisoned mutex to fail tests early
        let mut now = self.now.lock().expect("mutex poisoned");
        *now = instant;
    }
}

impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        // Test utility: panic on poisoned mutex to fail tests early
        *self.now.lock().expect("mutex poisoned")
    }
}
