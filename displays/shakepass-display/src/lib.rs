//! Host-side display components for ShakePass
//!
//! This crate provides:
//! - [`DisplayState`], a mirror of the device built only from inbound lines
//! - [`RevealFrames`] and [`spawn_reveal`] for the password reveal animation
//! - [`DisplayBackend`] trait with an ANSI terminal implementation
//! - [`Renderer`] trait and the text renderer that lays out a [`Screen`]
//!
//! # Architecture
//!
//! The monitor binary owns one `DisplayState` on its UI thread. Decoded
//! device messages and [`UiUpdate`]s from worker threads arrive over
//! channels and are applied in order; rendering only ever reads the mirror.

pub mod backend;
pub mod mirror;
pub mod render;
pub mod reveal;
pub mod screen;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError, TerminalBackend};
pub use mirror::{DisplayState, Effect, LinkStatus, SampleHistory, UiUpdate, HISTORY_LEN};
pub use render::{Renderer, TextRenderer};
pub use reveal::{spawn_reveal, Frame, RevealFrames, FRAME_DELAY, REVEAL_CHARSET};
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
