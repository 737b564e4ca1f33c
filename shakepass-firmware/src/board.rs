//! Board glue
//!
//! Pin assignments for a Raspberry Pi Pico with a LIS3DH breakout and two
//! push buttons, plus the core trait implementations over the shared state
//! in [`crate::channels`].
//!
//! | Function      | GPIO |
//! |---------------|------|
//! | Host UART TX  | 0    |
//! | Host UART RX  | 1    |
//! | LIS3DH SDA    | 4    |
//! | LIS3DH SCL    | 5    |
//! | Button A      | 14   |
//! | Button B      | 15   |
//! | Status LED    | 25   |
//! | Microphone    | 26   |

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::Instant;

use shakepass_core::traits::{
    Acceleration, Button, Controls, Icon, Link, SensorSource, StatusDisplay,
};
use shakepass_protocol::{DeviceMessage, HostCommand};

use crate::channels::{
    CLICKED_A, CLICKED_B, COMMAND_CHANNEL, HELD_A, HELD_B, LATEST_ACCEL, OUTBOX, SHAKEN,
    SOUND_LEVEL,
};

/// The engine's view of the board
pub struct PicoBoard {
    led: Output<'static>,
    has_microphone: bool,
}

impl PicoBoard {
    pub fn new(led: Output<'static>, has_microphone: bool) -> Self {
        Self {
            led,
            has_microphone,
        }
    }
}

impl SensorSource for PicoBoard {
    fn now_ms(&mut self) -> u32 {
        Instant::now().as_millis() as u32
    }

    fn acceleration(&mut self) -> Acceleration {
        LATEST_ACCEL.lock(|cell| cell.get())
    }

    fn sound_level(&mut self) -> Option<u8> {
        self.has_microphone
            .then(|| SOUND_LEVEL.load(Ordering::Relaxed))
    }
}

impl Controls for PicoBoard {
    fn is_pressed(&mut self, button: Button) -> bool {
        match button {
            Button::A => HELD_A.load(Ordering::Relaxed),
            Button::B => HELD_B.load(Ordering::Relaxed),
        }
    }

    fn was_pressed(&mut self, button: Button) -> bool {
        match button {
            Button::A => CLICKED_A.swap(false, Ordering::Relaxed),
            Button::B => CLICKED_B.swap(false, Ordering::Relaxed),
        }
    }

    fn was_shaken(&mut self) -> bool {
        SHAKEN.swap(false, Ordering::Relaxed)
    }
}

/// Status output: the on-board LED plus defmt log lines
impl StatusDisplay for PicoBoard {
    fn show_length(&mut self, length: u8) {
        info!("Length: {}", length);
    }

    fn show_password(&mut self, password: &str) {
        info!("Password: {}", password);
        self.led.set_high();
    }

    fn show_strength(&mut self, label: &str) {
        info!("Strength: {}", label);
        self.led.set_low();
    }

    fn show_icon(&mut self, icon: Icon) {
        debug!("Icon: {:?}", icon);
        self.led.set_high();
    }

    fn clear(&mut self) {
        self.led.set_low();
    }
}

/// The engine's side of the host link
pub struct ChannelLink;

impl Link for ChannelLink {
    fn poll_command(&mut self) -> Option<HostCommand> {
        COMMAND_CHANNEL.try_receive().ok()
    }

    fn send(&mut self, msg: DeviceMessage) {
        if OUTBOX.try_send(msg).is_err() {
            warn!("Outbox full, dropping message");
        }
    }
}
