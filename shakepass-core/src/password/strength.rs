//! Strength grading
//!
//! Device and host grade with the same rule over (length, class count) but
//! spell the second tier differently (`OK` vs `GOOD`), and they count
//! classes slightly differently: the device only counts characters from its
//! own alphabets, the host counts anything that is not an ASCII letter or
//! digit as a symbol.

use super::alphabet::{DIGITS, LOWER, SYMBOLS, UPPER};

/// Strength tier, ordered weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Strength {
    Weak,
    Fair,
    Good,
    Strong,
}

/// Which side's wording to use for a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Vocabulary {
    /// Labels emitted in `ST:` lines
    Device,
    /// Labels shown by the display client
    Host,
}

impl Strength {
    /// Human-readable label in the given vocabulary
    pub fn label(self, vocabulary: Vocabulary) -> &'static str {
        match (self, vocabulary) {
            (Strength::Weak, _) => "WEAK",
            (Strength::Fair, _) => "FAIR",
            (Strength::Good, Vocabulary::Device) => "OK",
            (Strength::Good, Vocabulary::Host) => "GOOD",
            (Strength::Strong, _) => "STRONG",
        }
    }
}

/// Grade a password from its length and number of character classes
pub fn grade(length: usize, classes: u8) -> Strength {
    if length >= 14 && classes >= 4 {
        Strength::Strong
    } else if length >= 12 && classes >= 3 {
        Strength::Good
    } else if length >= 10 && classes >= 2 {
        Strength::Fair
    } else {
        Strength::Weak
    }
}

/// Character classes present in a password
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassSet {
    pub lower: bool,
    pub upper: bool,
    pub digit: bool,
    pub symbol: bool,
}

impl ClassSet {
    /// Classes as the device counts them
    pub fn device(password: &str) -> Self {
        let mut set = Self::default();
        for c in password.bytes() {
            if LOWER.contains(&c) {
                set.lower = true;
            } else if UPPER.contains(&c) {
                set.upper = true;
            } else if DIGITS.contains(&c) {
                set.digit = true;
            } else if SYMBOLS.contains(&c) {
                set.symbol = true;
            }
        }
        set
    }

    /// Classes as the display client counts them
    pub fn host(password: &str) -> Self {
        let mut set = Self::default();
        for c in password.chars() {
            if c.is_ascii_lowercase() {
                set.lower = true;
            } else if c.is_ascii_uppercase() {
                set.upper = true;
            } else if c.is_ascii_digit() {
                set.digit = true;
            } else {
                set.symbol = true;
            }
        }
        set
    }

    /// Number of classes present
    pub fn count(&self) -> u8 {
        [self.lower, self.upper, self.digit, self.symbol]
            .iter()
            .filter(|&&present| present)
            .count() as u8
    }
}

/// Grade a password the way the device does
pub fn device_strength(password: &str) -> Strength {
    grade(password.len(), ClassSet::device(password).count())
}

/// Grade a password the way the display client does
pub fn host_strength(password: &str) -> Strength {
    grade(password.chars().count(), ClassSet::host(password).count())
}
