//! Telemetry rate limiter

/// Gate for the periodic `S:` stream
///
/// Opens at most once per interval while enabled. The first sample goes out
/// once the clock has passed one full interval after boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryGate {
    enabled: bool,
    interval_ms: u32,
    last_sent_ms: u32,
}

impl TelemetryGate {
    pub const fn new(enabled: bool, interval_ms: u32) -> Self {
        Self {
            enabled,
            interval_ms,
            last_sent_ms: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns true, and restarts the interval, if a sample may be sent now
    pub fn ready(&mut self, now_ms: u32) -> bool {
        if !self.enabled || now_ms.wrapping_sub(self.last_sent_ms) < self.interval_ms {
            return false;
        }
        self.last_sent_ms = now_ms;
        true
    }
}
