//! Button debouncing
//!
//! A reading must hold for `threshold` consecutive polls before the stable
//! state flips. Poll every few milliseconds.

use embedded_hal::digital::InputPin;

/// Stable-state change reported by the debouncer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// Counter-based debouncer
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    stable: bool,
    count: u8,
    threshold: u8,
}

impl Debouncer {
    /// Create a debouncer that starts released
    pub const fn new(threshold: u8) -> Self {
        Self {
            stable: false,
            count: 0,
            threshold,
        }
    }

    /// Debounced pressed state
    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    /// Feed one raw reading (true = pressed)
    pub fn update(&mut self, raw: bool) -> Option<Edge> {
        if raw == self.stable {
            self.count = 0;
            return None;
        }

        self.count += 1;
        if self.count < self.threshold {
            return None;
        }

        self.count = 0;
        self.stable = raw;
        Some(if raw { Edge::Pressed } else { Edge::Released })
    }
}

/// Active-low push button on a GPIO
pub struct ButtonInput<P> {
    pin: P,
    debouncer: Debouncer,
}

impl<P: InputPin> ButtonInput<P> {
    pub fn new(pin: P, threshold: u8) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(threshold),
        }
    }

    /// Sample the pin once
    ///
    /// A pin read error counts as "not pressed".
    pub fn poll(&mut self) -> Option<Edge> {
        let raw = self.pin.is_low().unwrap_or(false);
        self.debouncer.update(raw)
    }

    pub fn is_pressed(&self) -> bool {
        self.debouncer.is_pressed()
    }
}
