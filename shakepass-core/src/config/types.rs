//! Configuration type definitions

use crate::entropy::DEFAULT_SEED;

/// Shortest password the engine will generate
pub const MIN_LENGTH: u8 = 8;

/// Longest password the engine will generate
pub const MAX_LENGTH: u8 = 24;

/// Length used until the user changes it
pub const DEFAULT_LENGTH: u8 = 12;

/// Configured password length, always within [`MIN_LENGTH`]..=[`MAX_LENGTH`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PasswordLength(u8);

impl Default for PasswordLength {
    fn default() -> Self {
        Self(DEFAULT_LENGTH)
    }
}

impl PasswordLength {
    /// Shortest allowed length
    pub const MIN: Self = Self(MIN_LENGTH);

    /// Longest allowed length
    pub const MAX: Self = Self(MAX_LENGTH);

    /// Clamp an arbitrary request into the allowed range
    pub fn clamped(requested: i64) -> Self {
        Self(requested.clamp(MIN_LENGTH as i64, MAX_LENGTH as i64) as u8)
    }

    /// Length in characters
    pub const fn get(self) -> u8 {
        self.0
    }

    /// One longer, saturating at the maximum
    pub fn increment(self) -> Self {
        Self::clamped(self.0 as i64 + 1)
    }

    /// One shorter, saturating at the minimum
    pub fn decrement(self) -> Self {
        Self::clamped(self.0 as i64 - 1)
    }
}

/// Engine timing and behaviour settings
///
/// All durations are in milliseconds. The engine never sleeps itself; each
/// `step` returns the delay the caller should wait before the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// Initial accumulator state
    pub seed: u32,
    /// Password length at power-on
    pub initial_length: PasswordLength,
    /// Whether the `S:` stream starts enabled
    pub telemetry_enabled: bool,
    /// Minimum spacing between two `S:` lines
    pub telemetry_interval_ms: u32,
    /// Main loop period while idle
    pub idle_tick_ms: u32,
    /// Samples taken while charging (PRE)
    pub charge_iterations: u8,
    /// Delay between charge samples
    pub charge_tick_ms: u32,
    /// Pause between showing the password and publishing it
    pub reveal_pause_ms: u32,
    /// Telemetry ticks after publishing (POST)
    pub settle_iterations: u8,
    /// Delay between settle ticks
    pub settle_tick_ms: u32,
    /// Poll interval while waiting for the buttons to be released
    pub release_poll_ms: u32,
    /// Samples taken in response to a shake gesture
    pub shake_burst: u8,
    /// Delay between shake samples
    pub shake_tick_ms: u32,
    /// How long a status icon stays lit
    pub icon_hold_ms: u32,
    /// Sound level above which a noise event is mixed in
    pub loud_threshold: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            initial_length: PasswordLength::default(),
            telemetry_enabled: true,
            telemetry_interval_ms: 120,
            idle_tick_ms: 40,
            charge_iterations: 14,
            charge_tick_ms: 25,
            reveal_pause_ms: 250,
            settle_iterations: 10,
            settle_tick_ms: 30,
            release_poll_ms: 20,
            shake_burst: 20,
            shake_tick_ms: 10,
            icon_hold_ms: 120,
            loud_threshold: 120,
        }
    }
}

impl EngineConfig {
    /// Same settings with a different accumulator seed
    pub fn with_seed(self, seed: u32) -> Self {
        Self { seed, ..self }
    }
}
