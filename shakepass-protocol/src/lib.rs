//! ShakePass Serial Protocol
//!
//! This crate defines the UART line protocol between the ShakePass device
//! (entropy engine) and the display client running on a host computer.
//!
//! # Protocol Overview
//!
//! Every message is one line of UTF-8 text terminated by `\n`:
//! ```text
//! device → host                     host → device
//! ─────────────────────────────     ─────────────────────
//! S:<t>,<ax>,<ay>,<az>,<sound>      GEN
//! EV:IDLE|PRE|GEN|POST              LEN:<int>
//! PW:<password>                     TELEM:ON | TELEM:OFF
//! ST:<label>                        LAST
//! LN:<int>
//! ```
//!
//! Decoding is strict: each line yields either a typed message or
//! [`Decoded::Ignored`] with the reason it was rejected. Neither side ever
//! answers a bad line, they just drop it.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod line;
pub mod messages;
pub mod phase;

pub use line::{Line, LineBuffer, LineError, MAX_LINE_LEN};
pub use messages::{
    Decoded, DeviceMessage, HostCommand, IgnoreReason, Label, Password, SensorSample,
    MAX_LABEL_LEN, MAX_PASSWORD_LEN,
};
pub use phase::Phase;

/// Serial baud rate used by both ends of the link
pub const BAUD_RATE: u32 = 115_200;
