//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use slotwise_domain::SlotwiseError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SlotwiseError);

impl From<InfraError> for SlotwiseError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SlotwiseError> for InfraError {
    fn from(value: SlotwiseError) -> Self {
        Self(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SlotwiseError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        let message = if err.is_timeout() {
            format!("calendar API request timed out: {err}")
        } else if err.is_connect() {
            format!("failed to reach the calendar API: {err}")
        } else if err.is_decode() {
            format!("failed to decode calendar API response: {err}")
        } else {
            format!("calendar API request failed: {err}")
        };
        // Everything the transport can throw is retryable from the caller's
        // point of view; the request itself was well-formed.
        Self(SlotwiseError::RepositoryUnavailable(message))
    }
}
