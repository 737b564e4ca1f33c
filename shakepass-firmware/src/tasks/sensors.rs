//! Sensor sampling task
//!
//! Reads the accelerometer at 100 Hz, runs shake detection and meters the
//! microphone. Results are published for the engine; a failed read keeps
//! the previous good value. A missing accelerometer is retried in the
//! background and never holds up the microphone.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Ticker};

use shakepass_drivers::accel::{HealthChange, Lis3dh, SensorHealth};
use shakepass_drivers::audio::{AdcReader, SoundMeter};
use shakepass_drivers::input::{ShakeConfig, ShakeDetector};

use crate::channels::{LATEST_ACCEL, SHAKEN, SOUND_LEVEL};

/// Sample period (100 Hz)
const SAMPLE_MS: u64 = 10;

/// Raw microphone samples per level update
const MIC_WINDOW: u16 = 32;

/// Ticks between accelerometer setup attempts (500 ms)
const INIT_RETRY_TICKS: u16 = 50;

/// Accelerometer type on this board
pub type Accelerometer = Lis3dh<I2c<'static, I2C0, Async>>;

/// Electret microphone on an ADC pin
pub struct Microphone {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl Microphone {
    pub fn new(adc: Adc<'static, Blocking>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AdcReader for Microphone {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(&mut self.channel).map_err(|_| ())
    }
}

/// Sensor task
#[embassy_executor::task]
pub async fn sensors_task(mut accel: Accelerometer, microphone: Option<Microphone>) {
    info!("Sensor task started");

    let mut health = SensorHealth::new(INIT_RETRY_TICKS);
    let mut shake = ShakeDetector::new(ShakeConfig::default());
    let mut meter = microphone.map(|mic| SoundMeter::new(mic, MIC_WINDOW));
    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_MS));

    loop {
        if health.init_due() {
            let result = accel.init().await;
            if let Err(e) = &result {
                debug!("LIS3DH init failed: {:?}", e);
            }
            match health.init_done(result.is_ok()) {
                Some(HealthChange::Fault) => warn!("LIS3DH not responding, retrying"),
                _ if health.is_ready() => info!("LIS3DH ready"),
                _ => {}
            }
        }

        if health.is_ready() {
            match accel.read_mg().await {
                Ok(reading) => {
                    LATEST_ACCEL.lock(|cell| cell.set(reading));
                    if shake.update(reading) {
                        debug!("Shake detected");
                        SHAKEN.store(true, Ordering::Relaxed);
                    }
                    if health.read_done(true).is_some() {
                        info!("LIS3DH reads recovered");
                    }
                }
                Err(e) => {
                    if health.read_done(false).is_some() {
                        warn!("LIS3DH read failed: {:?}", e);
                    }
                }
            }
        }

        if let Some(meter) = meter.as_mut() {
            for _ in 0..MIC_WINDOW {
                if let Some(level) = meter.poll() {
                    SOUND_LEVEL.store(level, Ordering::Relaxed);
                }
            }
        }

        ticker.next().await;
    }
}
