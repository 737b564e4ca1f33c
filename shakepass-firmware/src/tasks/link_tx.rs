//! Host UART transmit task
//!
//! Drains the outbox and writes each message as one line.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::OUTBOX;

/// Link TX task - sends queued messages to the host
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        let msg = OUTBOX.receive().await;
        let line = msg.encode();

        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to send line: {:?}", e);
        }
    }
}
