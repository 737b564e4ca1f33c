//! ShakePass - Sensor-Entropy Password Generator Firmware
//!
//! Main firmware binary for an RP2040 board with a LIS3DH accelerometer,
//! two buttons and an optional analog microphone. Streams telemetry and
//! generated passwords to the display client over UART0.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use shakepass_core::EngineConfig;
use shakepass_drivers::accel::lis3dh::{Lis3dh, DEFAULT_ADDR};
use shakepass_protocol::BAUD_RATE;

mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// I2C clock for the accelerometer
const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ShakePass firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Host link on UART0 (GPIO0 TX, GPIO1 RX)
    let uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = BAUD_RATE;
        cfg
    };

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", BAUD_RATE);

    // Accelerometer on I2C0 (GPIO4 SDA, GPIO5 SCL)
    let i2c_config = {
        let mut cfg = i2c::Config::default();
        cfg.frequency = I2C_FREQUENCY_HZ;
        cfg
    };
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);
    let accel = Lis3dh::new(i2c, DEFAULT_ADDR);

    // Microphone on ADC0 (GPIO26)
    #[cfg(feature = "microphone")]
    let microphone = {
        use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
        let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
        let channel = Channel::new_pin(p.PIN_26, Pull::None);
        info!("Microphone enabled");
        Some(tasks::Microphone::new(adc, channel))
    };
    #[cfg(not(feature = "microphone"))]
    let microphone: Option<tasks::Microphone> = None;

    let has_microphone = microphone.is_some();

    // Buttons (active low, GPIO14 = A, GPIO15 = B)
    let button_a = Input::new(p.PIN_14, Pull::Up);
    let button_b = Input::new(p.PIN_15, Pull::Up);

    // On-board LED
    let led = Output::new(p.PIN_25, Level::Low);

    let board = board::PicoBoard::new(led, has_microphone);
    let config = EngineConfig::default();

    info!("Hardware initialized");

    // Spawn tasks
    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::buttons_task(button_a, button_b)).unwrap();
    spawner.spawn(tasks::sensors_task(accel, microphone)).unwrap();
    spawner.spawn(tasks::engine_task(board, config)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
