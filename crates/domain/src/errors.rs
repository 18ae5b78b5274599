//! Error types used throughout the scheduler

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Slotwise
///
/// The taxonomy separates errors by what the caller may safely do next:
/// `InvalidRequest` and `InvalidReference` require corrected input,
/// `RepositoryUnavailable` is retryable with backoff, `Conflict` requires
/// re-resolving the slot, and `Cancelled` means the caller aborted the turn.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SlotwiseError {
    /// Malformed interval, duration, or horizon. Rejected before any I/O.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A relative request's anchor event was not found.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Transient calendar backend failure. The caller may retry with backoff.
    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(String),

    /// A booking race was lost. The caller must re-resolve, not retry blindly.
    #[error("Booking conflict: {0}")]
    Conflict(String),

    /// The conversation turn was aborted before a repository call.
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Scheduler configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SlotwiseError {
    /// Whether the whole operation can be retried as-is.
    ///
    /// Only transient repository failures qualify; a `Conflict` must go back
    /// through resolution and invalid input must be corrected first.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RepositoryUnavailable(_))
    }
}

/// Result type alias for Slotwise operations
pub type Result<T> = std::result::Result<T, SlotwiseError>;
