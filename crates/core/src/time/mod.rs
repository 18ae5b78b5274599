//! Time utilities and abstractions
//!
//! This module provides the time handling the rest of the core builds on:
//! - **[`clock`]**: Real and mock wall-clock time for deterministic testing
//! - **[`interval`]**: Half-open interval arithmetic, relative time
//!   resolution, and local-day widening
//!
//! The [`Clock`] trait is the sole time source the core may consult; no
//! other module reads the wall clock directly.

pub mod clock;
pub mod interval;

// Re-export commonly used items
pub use clock::{Clock, MockClock, SystemClock};
pub use interval::{day_bounds, envelope, overlaps, resolve_relative};
