//! Accelerometer drivers

pub mod health;
pub mod lis3dh;

pub use health::{HealthChange, SensorHealth};
pub use lis3dh::{Lis3dh, Lis3dhError};
