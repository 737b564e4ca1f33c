//! Serial link trait

use shakepass_protocol::{DeviceMessage, HostCommand};

/// Trait for the engine's side of the serial link
///
/// This trait abstracts the UART connection to the display client. Inbound
/// lines are decoded elsewhere; the engine only sees complete commands.
pub trait Link {
    /// Take the next pending command without blocking
    fn poll_command(&mut self) -> Option<HostCommand>;

    /// Queue a message for transmission
    ///
    /// Messages that cannot be queued are dropped by the implementation.
    fn send(&mut self, msg: DeviceMessage);
}
