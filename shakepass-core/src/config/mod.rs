//! Configuration types
//!
//! Board-agnostic engine settings. Defaults reproduce the timings of the
//! reference device.

pub mod types;

pub use types::*;
