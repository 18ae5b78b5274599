//! # Slotwise Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Time utilities (clock abstraction, interval arithmetic, relative
//!   time resolution)
//! - Port/adapter interfaces (traits)
//! - The availability checker, alternative-slot finder, and the resolution
//!   workflow service
//!
//! ## Architecture Principles
//! - Only depends on `slotwise-domain`
//! - No HTTP or calendar-backend code
//! - All external dependencies via traits
//! - Checker and finder are pure functions, safe for unlimited parallel use

pub mod scheduling;
pub mod time;

// Re-export specific items to avoid ambiguity
pub use scheduling::ports::{EventRepository, SlotRequestParser};
pub use scheduling::SchedulingService;
pub use time::{Clock, MockClock, SystemClock};
