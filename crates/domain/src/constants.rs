//! Domain constants and scheduler defaults

/// Candidate enumeration stride in minutes. The effective stride is the
/// smaller of this and the requested duration, which bounds the number of
/// candidates a large gap can produce.
pub const DEFAULT_SLOT_STEP_MINUTES: i64 = 15;

/// Maximum number of alternative slots returned per resolution.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;

/// Default search horizon around the requested slot, in hours.
pub const DEFAULT_HORIZON_HOURS: i64 = 4;

/// Widened horizon used when the default horizon yields no candidates,
/// in hours forward/backward from the request.
pub const DEFAULT_EXTENDED_HORIZON_HOURS: i64 = 48;

/// Hard upper bound on any search horizon, in hours. Horizons wider than
/// this are rejected so repository queries stay bounded.
pub const MAX_HORIZON_HOURS: i64 = 14 * 24;

/// Timeout applied to a single repository call, in seconds.
pub const DEFAULT_REPOSITORY_TIMEOUT_SECS: u64 = 10;

/// Lookahead window for listing upcoming events, in hours.
pub const DEFAULT_UPCOMING_LOOKAHEAD_HOURS: i64 = 7 * 24;
