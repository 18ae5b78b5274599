//! Scheduler configuration
//!
//! Configuration is passed explicitly into the scheduling service
//! constructor, never read from ambient global state, so one process can
//! serve several calendars and timezones concurrently.

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EXTENDED_HORIZON_HOURS, DEFAULT_HORIZON_HOURS, DEFAULT_MAX_SUGGESTIONS,
    DEFAULT_REPOSITORY_TIMEOUT_SECS, DEFAULT_SLOT_STEP_MINUTES, DEFAULT_UPCOMING_LOOKAHEAD_HOURS,
    MAX_HORIZON_HOURS,
};

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Canonical timezone for day widening and local-time views.
    pub timezone: Tz,
    /// Target calendar identifier ("primary" for the default calendar).
    pub calendar_id: String,
    /// Alternative-slot search knobs.
    pub search: SearchConfig,
    /// Repository call knobs.
    pub repository: RepositoryConfig,
}

/// Alternative-slot search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default horizon around the requested slot, in hours.
    pub horizon_hours: i64,
    /// Widened horizon used when the default yields nothing, in hours.
    pub extended_horizon_hours: i64,
    /// Hard bound on any horizon, in hours; wider searches are rejected.
    pub max_horizon_hours: i64,
    /// Candidate enumeration stride, in minutes.
    pub slot_step_minutes: i64,
    /// Maximum number of alternatives returned.
    pub max_suggestions: usize,
    /// Optional local-time window suggestions must start within.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_hours: Option<BusinessHours>,
}

/// Local-time window that suggested slots must start within
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BusinessHours {
    /// Earliest local start time for a suggestion.
    pub start: NaiveTime,
    /// Latest local start time for a suggestion (exclusive).
    pub end: NaiveTime,
}

/// Event repository call configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Timeout applied to each repository call, in seconds.
    pub call_timeout_secs: u64,
    /// Lookahead window for listing upcoming events, in hours.
    pub upcoming_lookahead_hours: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            calendar_id: "primary".to_string(),
            search: SearchConfig::default(),
            repository: RepositoryConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            horizon_hours: DEFAULT_HORIZON_HOURS,
            extended_horizon_hours: DEFAULT_EXTENDED_HORIZON_HOURS,
            max_horizon_hours: MAX_HORIZON_HOURS,
            slot_step_minutes: DEFAULT_SLOT_STEP_MINUTES,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            business_hours: None,
        }
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: DEFAULT_REPOSITORY_TIMEOUT_SECS,
            upcoming_lookahead_hours: DEFAULT_UPCOMING_LOOKAHEAD_HOURS,
        }
    }
}
