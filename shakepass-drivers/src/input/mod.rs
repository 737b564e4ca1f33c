//! User input drivers

pub mod debounce;
pub mod shake;

pub use debounce::{ButtonInput, Debouncer, Edge};
pub use shake::{ShakeConfig, ShakeDetector};
