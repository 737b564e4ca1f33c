//! Entropy and password engine
//!
//! Ties the entropy pool, generator and lifecycle to the board and the
//! serial link. Everything is driven from [`Engine::step`].

pub mod commands;
pub mod runner;
pub mod telemetry;

pub use runner::{Activity, Engine};
pub use telemetry::TelemetryGate;
