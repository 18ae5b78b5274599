//! # Slotwise Domain
//!
//! Business domain types and models for Slotwise.
//!
//! This crate contains:
//! - Domain data types (TimeInterval, CalendarEvent, SlotRequest, ...)
//! - Domain error types and Result definitions
//! - Scheduler configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Slotwise crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
