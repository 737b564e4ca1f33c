//! Entropy pool implementation

use crate::traits::{Acceleration, SensorSource};

/// Accumulator state at power-on
pub const DEFAULT_SEED: u32 = 0xA3C5_9AC3;

/// Salt mixed with the clock when the length goes up
pub const LENGTH_UP_SALT: u32 = 0xA55A;

/// Salt mixed with the clock when the length goes down
pub const LENGTH_DOWN_SALT: u32 = 0x5AA5;

/// Golden-ratio increment added on every mix
const GOLDEN_GAMMA: u32 = 0x9E37_79B9;

/// Fold one sensor reading into a 32-bit word
///
/// `v = t ^ (ax << 1) ^ (ay << 2) ^ (az << 3) ^ (sound << 8)`, computed on
/// the two's-complement bit patterns. The sound term is skipped without a
/// microphone.
pub fn combine(t_ms: u32, accel: Acceleration, sound: Option<u8>) -> u32 {
    let axis = |v: i16, shift: u32| (v as i32 as u32) << shift;

    let mut v = t_ms ^ axis(accel.x, 1) ^ axis(accel.y, 2) ^ axis(accel.z, 3);
    if let Some(level) = sound {
        v ^= (level as u32) << 8;
    }
    v
}

/// Mixed-entropy accumulator
///
/// Owned by the engine and threaded explicitly through sampling and
/// generation, so tests can start from any seed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EntropyPool {
    state: u32,
    samples: u32,
}

impl Default for EntropyPool {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl EntropyPool {
    /// Create a pool with the given initial state
    pub const fn with_seed(seed: u32) -> Self {
        Self {
            state: seed,
            samples: 0,
        }
    }

    /// Current accumulator value
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Number of sensor samples mixed in so far
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Scramble `v` into the accumulator
    pub fn mix(&mut self, v: u32) {
        let mut s = self.state ^ v;
        s = s.wrapping_add(GOLDEN_GAMMA);
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
    }

    /// Read the clock and sensors once and mix the result
    pub fn sample<S: SensorSource + ?Sized>(&mut self, source: &mut S) {
        let t_ms = source.now_ms();
        let accel = source.acceleration();
        let sound = source.sound_level();
        self.mix(combine(t_ms, accel, sound));
        self.samples = self.samples.wrapping_add(1);
    }

    /// Sample once, then reduce the accumulator below `n`
    ///
    /// Uses a plain modulo, so results are biased when `n` is not a power of
    /// two. Returns 0 for `n <= 1`.
    pub fn randbelow<S: SensorSource + ?Sized>(&mut self, n: u32, source: &mut S) -> u32 {
        self.sample(source);
        if n <= 1 {
            return 0;
        }
        self.state % n
    }
}
