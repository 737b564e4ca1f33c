//! Password generation and strength grading

pub mod alphabet;
pub mod generator;
pub mod strength;

pub use generator::generate;
pub use strength::{device_strength, grade, host_strength, ClassSet, Strength, Vocabulary};
