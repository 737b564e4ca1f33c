//! Serial link to the device
//!
//! A reader thread turns raw bytes into decoded lines and posts them to the
//! UI thread. Commands go out through [`CommandWriter`] on a cloned handle.

use std::io::{self, ErrorKind, Read, Write};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};
use serialport::SerialPort;
use shakepass_display::LinkStatus;
use shakepass_protocol::{Decoded, DeviceMessage, HostCommand, LineBuffer, LineError};

/// Blocking read timeout
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Pause after a transport error before reading again
pub const RETRY_DELAY: Duration = Duration::from_millis(200);

/// What the reader posts to the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// One complete line, decoded or rejected
    Line(Decoded<DeviceMessage>),
    /// A line longer than the protocol allows was discarded
    Overflow,
    /// Link status changed
    Status(LinkStatus),
}

/// Open a port with the protocol's framing
pub fn open(port: &str, baud: u32) -> serialport::Result<Box<dyn SerialPort>> {
    serialport::new(port, baud).timeout(READ_TIMEOUT).open()
}

/// Start the reader thread
///
/// Timeouts are normal and silent. Any other error is reported once and
/// reading resumes after [`RETRY_DELAY`]. The thread ends on end of stream
/// or when the UI side hangs up.
pub fn spawn_reader<R>(
    port: String,
    mut reader: R,
    inbound: Sender<Inbound>,
) -> io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("serial-rx".into())
        .spawn(move || {
            let mut lines = LineBuffer::new();
            let mut buf = [0u8; 256];
            let mut faulted = false;

            loop {
                match reader.read(&mut buf) {
                    Ok(0) => {
                        warn!("{port}: end of stream");
                        let _ = inbound.send(Inbound::Status(LinkStatus::Error(format!(
                            "{port}: disconnected"
                        ))));
                        return;
                    }
                    Ok(n) => {
                        if faulted {
                            faulted = false;
                            let status = LinkStatus::Connected(port.clone());
                            if inbound.send(Inbound::Status(status)).is_err() {
                                return;
                            }
                        }

                        let mut hung_up = false;
                        lines.feed_bytes(&buf[..n], |line| {
                            let item = match line {
                                Ok(line) => Inbound::Line(DeviceMessage::decode(&line)),
                                Err(LineError::Overflow) => Inbound::Overflow,
                            };
                            hung_up |= inbound.send(item).is_err();
                        });
                        if hung_up {
                            debug!("UI gone, reader exiting");
                            return;
                        }
                    }
                    Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => {}
                    Err(e) => {
                        if !faulted {
                            faulted = true;
                            warn!("{port}: read failed: {e}");
                            let status = LinkStatus::Error(format!("{port}: {e}"));
                            if inbound.send(Inbound::Status(status)).is_err() {
                                return;
                            }
                        }
                        thread::sleep(RETRY_DELAY);
                    }
                }
            }
        })
}

/// Writes host commands as lines
pub struct CommandWriter<W: Write> {
    out: W,
}

impl<W: Write> CommandWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Send one command, terminator included
    pub fn send(&mut self, cmd: HostCommand) -> io::Result<()> {
        let line = cmd.encode();
        debug!("-> {}", line.trim_end());
        self.out.write_all(line.as_bytes())?;
        self.out.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
