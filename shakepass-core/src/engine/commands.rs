//! Host command interpreter

use shakepass_protocol::{DeviceMessage, HostCommand};

use crate::config::PasswordLength;
use crate::state::TriggerSource;
use crate::traits::{Board, Link};

use super::runner::Engine;

impl Engine {
    /// Apply one host command
    ///
    /// Returns true if the command started a generation cycle. Commands are
    /// best-effort: anything that cannot be honoured right now is dropped
    /// without a reply.
    pub fn execute<B: Board + ?Sized, L: Link + ?Sized>(
        &mut self,
        cmd: HostCommand,
        board: &mut B,
        link: &mut L,
    ) -> bool {
        match cmd {
            HostCommand::Generate => self.start_cycle(TriggerSource::Command, link),
            HostCommand::SetLength(requested) => {
                self.set_length(PasswordLength::clamped(requested), board, link);
                false
            }
            HostCommand::Last => {
                if let Some(password) = self.stored_password() {
                    link.send(DeviceMessage::Password(password.clone()));
                }
                false
            }
            HostCommand::Telemetry(enabled) => {
                self.set_telemetry(enabled);
                false
            }
        }
    }
}
