//! Sound level meter
//!
//! An analog electret microphone module biased at mid-rail on an ADC pin.
//! Loudness is the peak-to-peak swing over a window of raw samples, scaled
//! from the 12-bit ADC range down to 0-255.

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Min/max tracker over one window of samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakToPeak {
    min: u16,
    max: u16,
    count: u16,
}

impl Default for PeakToPeak {
    fn default() -> Self {
        Self {
            min: u16::MAX,
            max: 0,
            count: 0,
        }
    }
}

impl PeakToPeak {
    pub fn push(&mut self, sample: u16) {
        self.min = self.min.min(sample);
        self.max = self.max.max(sample);
        self.count += 1;
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    /// Swing scaled to 0-255, or 0 for an empty window
    pub fn level(&self) -> u8 {
        if self.count == 0 {
            return 0;
        }
        ((self.max - self.min) >> 4).min(u8::MAX as u16) as u8
    }
}

/// Windowed microphone level meter
pub struct SoundMeter<ADC> {
    adc: ADC,
    window: u16,
    current: PeakToPeak,
    level: u8,
}

impl<ADC: AdcReader> SoundMeter<ADC> {
    /// Create a meter that publishes a level every `window` samples
    pub fn new(adc: ADC, window: u16) -> Self {
        Self {
            adc,
            window: window.max(1),
            current: PeakToPeak::default(),
            level: 0,
        }
    }

    /// Take one ADC sample; returns the new level when a window completes
    ///
    /// Failed reads are skipped.
    pub fn poll(&mut self) -> Option<u8> {
        let sample = self.adc.read().ok()?;
        self.current.push(sample);
        if self.current.count() < self.window {
            return None;
        }

        self.level = self.current.level();
        self.current = PeakToPeak::default();
        Some(self.level)
    }

    /// Level of the last completed window
    pub fn level(&self) -> u8 {
        self.level
    }
}
