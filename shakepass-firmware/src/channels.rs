//! Inter-task communication channels
//!
//! Defines the static channels and shared readings used between Embassy
//! tasks. Uses embassy-sync primitives for the queues and atomics for the
//! input flags.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use portable_atomic::{AtomicBool, AtomicU8};

use shakepass_core::traits::Acceleration;
use shakepass_protocol::{DeviceMessage, HostCommand};

/// Channel capacity for host commands
const COMMAND_CHANNEL_SIZE: usize = 8;

/// Channel capacity for outgoing lines (one full GEN burst fits)
const OUTBOX_SIZE: usize = 16;

/// Commands decoded from the host link
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, HostCommand, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Messages waiting to be written to the host link
pub static OUTBOX: Channel<CriticalSectionRawMutex, DeviceMessage, OUTBOX_SIZE> = Channel::new();

/// Most recent good accelerometer reading (updated by sensor task)
pub static LATEST_ACCEL: Mutex<CriticalSectionRawMutex, Cell<Acceleration>> =
    Mutex::new(Cell::new(Acceleration::new(0, 0, 0)));

/// Most recent microphone level (updated by sensor task)
pub static SOUND_LEVEL: AtomicU8 = AtomicU8::new(0);

/// Shake gesture latched by the sensor task, cleared by the engine
pub static SHAKEN: AtomicBool = AtomicBool::new(false);

/// Debounced button state (updated by button task)
pub static HELD_A: AtomicBool = AtomicBool::new(false);
pub static HELD_B: AtomicBool = AtomicBool::new(false);

/// Press edges latched by the button task, cleared by the engine
pub static CLICKED_A: AtomicBool = AtomicBool::new(false);
pub static CLICKED_B: AtomicBool = AtomicBool::new(false);
