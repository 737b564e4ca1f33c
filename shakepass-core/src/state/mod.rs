//! Generation lifecycle
//!
//! The phase is explicit, finite and deterministic. The same [`Phase`] type
//! is carried on the wire by `EV:` lines.

pub mod events;
pub mod machine;

pub use events::{Event, TriggerSource};
pub use machine::{transition, Lifecycle};
pub use shakepass_protocol::Phase;
