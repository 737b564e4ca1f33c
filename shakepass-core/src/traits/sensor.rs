//! Entropy sensor traits

/// Three-axis acceleration in milli-g
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acceleration {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Acceleration {
    /// Create a reading from its three axes
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }
}

/// Source of the raw readings that feed the entropy pool
///
/// Reads never fail from the engine's point of view. Implementations that
/// talk to real hardware should fall back to their last good reading when a
/// bus transaction fails, and report `None` for the sound level when no
/// microphone is fitted.
pub trait SensorSource {
    /// Monotonic milliseconds since boot (wraps after ~49 days)
    fn now_ms(&mut self) -> u32;

    /// Current acceleration
    fn acceleration(&mut self) -> Acceleration;

    /// Current microphone level (0-255), or `None` without a microphone
    fn sound_level(&mut self) -> Option<u8>;
}
