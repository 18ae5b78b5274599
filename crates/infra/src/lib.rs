//! # Slotwise Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The Google Calendar event repository adapter
//! - Conversions from transport errors into the domain taxonomy
//!
//! ## Architecture
//! - Implements traits defined in `slotwise-core`
//! - Contains all "impure" code (HTTP, credentials)

pub mod calendar;
pub mod errors;

// Re-export commonly used items
pub use calendar::*;
pub use errors::InfraError;
