//! Availability resolution: checker, slot finder, ports, and the workflow
//! service.

pub mod availability;
pub mod ports;
pub mod service;
pub mod slots;

pub use availability::check;
pub use service::SchedulingService;
pub use slots::find_alternatives;
