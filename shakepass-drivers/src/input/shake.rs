//! Shake gesture detection
//!
//! Counts jolts (large changes between consecutive accelerometer samples)
//! inside a sliding window. Enough jolts in one window is a shake; after
//! reporting one the detector stays quiet for a cooldown period.

use shakepass_core::traits::Acceleration;

/// Shake detector tuning, in samples and milli-g
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShakeConfig {
    /// Summed per-axis change that counts as a jolt
    pub jolt_mg: u32,
    /// Jolts needed within one window
    pub jolts_required: u8,
    /// Window length in samples
    pub window: u8,
    /// Samples to ignore after a detection
    pub cooldown: u8,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        // Tuned for 100 Hz sampling
        Self {
            jolt_mg: 900,
            jolts_required: 3,
            window: 50,
            cooldown: 50,
        }
    }
}

/// Sliding-window shake detector
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    config: ShakeConfig,
    last: Option<Acceleration>,
    jolts: u8,
    window_left: u8,
    cooldown_left: u8,
}

impl ShakeDetector {
    pub fn new(config: ShakeConfig) -> Self {
        Self {
            config,
            last: None,
            jolts: 0,
            window_left: 0,
            cooldown_left: 0,
        }
    }

    /// Feed one sample; returns true when a shake gesture completes
    pub fn update(&mut self, accel: Acceleration) -> bool {
        let previous = self.last.replace(accel);

        if self.cooldown_left > 0 {
            self.cooldown_left -= 1;
            return false;
        }

        let Some(previous) = previous else {
            return false;
        };

        if self.window_left > 0 {
            self.window_left -= 1;
            if self.window_left == 0 {
                self.jolts = 0;
            }
        }

        if jerk(previous, accel) < self.config.jolt_mg {
            return false;
        }

        if self.jolts == 0 {
            self.window_left = self.config.window;
        }
        self.jolts += 1;

        if self.jolts < self.config.jolts_required {
            return false;
        }

        self.jolts = 0;
        self.window_left = 0;
        self.cooldown_left = self.config.cooldown;
        true
    }
}

/// Sum of absolute per-axis differences
fn jerk(a: Acceleration, b: Acceleration) -> u32 {
    let d = |p: i16, q: i16| (p as i32 - q as i32).unsigned_abs();
    d(a.x, b.x) + d(a.y, b.y) + d(a.z, b.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REST: Acceleration = Acceleration::new(0, 0, -1024);
    const SWING: Acceleration = Acceleration::new(1500, -600, 200);

    #[test]
    fn test_still_device_never_shakes() {
        let mut detector = ShakeDetector::new(ShakeConfig::default());
        for _ in 0..500 {
            assert!(!detector.update(REST));
        }
    }

    #[test]
    fn test_back_and_forth_is_a_shake() {
        let mut detector = ShakeDetector::new(ShakeConfig::default());
        detector.update(REST);
        assert!(!detector.update(SWING));
        assert!(!detector.update(REST));
        assert!(detector.update(SWING));
    }

    #[test]
    fn test_cooldown_suppresses_repeat() {
        let config = ShakeConfig::default();
        let mut detector = ShakeDetector::new(config);
        detector.update(REST);
        detector.update(SWING);
        detector.update(REST);
        assert!(detector.update(SWING));

        for i in 0..config.cooldown as usize {
            let sample = if i % 2 == 0 { REST } else { SWING };
            assert!(!detector.update(sample));
        }
    }

    #[test]
    fn test_sparse_jolts_expire() {
        let config = ShakeConfig {
            window: 5,
            ..ShakeConfig::default()
        };
        let mut detector = ShakeDetector::new(config);
        detector.update(REST);
        for _ in 0..4 {
            assert!(!detector.update(SWING));
            for _ in 0..10 {
                assert!(!detector.update(SWING));
            }
            assert!(!detector.update(REST));
            for _ in 0..10 {
                assert!(!detector.update(REST));
            }
        }
    }
}
