//! Hardware driver implementations
//!
//! This crate provides the drivers behind the sensor and input traits
//! defined in shakepass-core:
//!
//! - Accelerometer (LIS3DH over I2C)
//! - Button debouncing and shake gesture detection
//! - Microphone level metering (analog electret on an ADC)

#![no_std]
#![deny(unsafe_code)]

pub mod accel;
pub mod audio;
pub mod input;
