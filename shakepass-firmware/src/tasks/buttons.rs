//! Button polling task
//!
//! Debounces both buttons and publishes held state and press edges.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use shakepass_drivers::input::{ButtonInput, Edge};

use crate::channels::{CLICKED_A, CLICKED_B, HELD_A, HELD_B};

/// Poll interval
const POLL_MS: u64 = 5;

/// Consecutive polls a level must hold (20 ms)
const DEBOUNCE_POLLS: u8 = 4;

/// Button task
#[embassy_executor::task]
pub async fn buttons_task(a: Input<'static>, b: Input<'static>) {
    info!("Button task started");

    let mut a = ButtonInput::new(a, DEBOUNCE_POLLS);
    let mut b = ButtonInput::new(b, DEBOUNCE_POLLS);
    let mut ticker = Ticker::every(Duration::from_millis(POLL_MS));

    loop {
        if a.poll() == Some(Edge::Pressed) {
            trace!("Button A pressed");
            CLICKED_A.store(true, Ordering::Relaxed);
        }
        if b.poll() == Some(Edge::Pressed) {
            trace!("Button B pressed");
            CLICKED_B.store(true, Ordering::Relaxed);
        }
        HELD_A.store(a.is_pressed(), Ordering::Relaxed);
        HELD_B.store(b.is_pressed(), Ordering::Relaxed);

        ticker.next().await;
    }
}
