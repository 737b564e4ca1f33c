//! Board-agnostic core logic for the ShakePass firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (sensors, buttons, status display, link)
//! - Entropy pool and its mixing function
//! - Password generation and strength grading
//! - Lifecycle state machine (IDLE → PRE → GEN → POST)
//! - The cooperative engine that ties them to the serial protocol
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod entropy;
pub mod password;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{EngineConfig, PasswordLength};
pub use engine::Engine;
pub use entropy::EntropyPool;
pub use state::{Event, Lifecycle, Phase};
