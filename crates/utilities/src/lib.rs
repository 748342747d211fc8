//! # Utilities
//! Helpers shared by the capture demo: timing spans and result extensions that log failures.
//!

pub mod failure;
pub mod timing;

pub use timing::{TimedSpan, display_duration};
