//! Calendar backend adapters.

pub mod google;

pub use google::{AccessTokenProvider, GoogleCalendarRepository, StaticTokenProvider};
