//! Host UART receive task
//!
//! Splits the byte stream into lines and queues decoded commands.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use shakepass_protocol::{Decoded, HostCommand, LineBuffer};

use crate::channels::COMMAND_CHANNEL;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - receives and parses command lines from the host
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut lines = LineBuffer::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match lines.feed(byte) {
                        Ok(Some(line)) => handle_line(&line),
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Line error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Decode one line and queue it for the engine
fn handle_line(line: &[u8]) {
    match HostCommand::decode(line) {
        Decoded::Message(cmd) => {
            debug!("Command: {:?}", cmd);
            if COMMAND_CHANNEL.try_send(cmd).is_err() {
                warn!("Command channel full, dropping command");
            }
        }
        Decoded::Ignored(reason) => {
            debug!("Ignored line: {:?}", reason);
        }
    }
}
