//! Microphone drivers

pub mod sound;

pub use sound::{AdcReader, PeakToPeak, SoundMeter};
