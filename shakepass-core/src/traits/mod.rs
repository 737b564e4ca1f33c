//! Hardware abstraction traits
//!
//! These traits define the interface between the engine and the
//! board-specific implementations in the firmware (or fakes in tests).

pub mod controls;
pub mod display;
pub mod link;
pub mod sensor;

pub use controls::{Button, Controls};
pub use display::{Icon, StatusDisplay};
pub use link::Link;
pub use sensor::{Acceleration, SensorSource};

/// Everything the engine needs from the board besides the serial link
pub trait Board: SensorSource + Controls + StatusDisplay {}

// Blanket implementation for any type providing all three
impl<T: SensorSource + Controls + StatusDisplay> Board for T {}
