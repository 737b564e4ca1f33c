//! LIS3DH accelerometer driver
//!
//! Runs the part in high-resolution mode at ±2 g, where one digit of the
//! left-justified 12-bit output is 1 mg.

use embedded_hal_async::i2c::I2c;
use shakepass_core::traits::Acceleration;

/// Default I2C address (SA0 low)
pub const DEFAULT_ADDR: u8 = 0x18;

/// Expected WHO_AM_I response
const DEVICE_ID: u8 = 0x33;

/// Auto-increment bit for multi-byte reads
const AUTO_INCREMENT: u8 = 0x80;

/// LIS3DH registers
mod reg {
    pub const WHO_AM_I: u8 = 0x0F;
    pub const CTRL_REG1: u8 = 0x20;
    pub const CTRL_REG4: u8 = 0x23;
    pub const OUT_X_L: u8 = 0x28;
}

/// 100 Hz, normal power, X/Y/Z enabled
const CTRL_REG1_100HZ_XYZ: u8 = 0x57;

/// Block data update, ±2 g, high resolution
const CTRL_REG4_BDU_HR_2G: u8 = 0x88;

/// LIS3DH errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lis3dhError<E> {
    /// I2C transaction failed
    Bus(E),
    /// Something other than a LIS3DH answered
    WrongDevice(u8),
}

impl<E> From<E> for Lis3dhError<E> {
    fn from(e: E) -> Self {
        Lis3dhError::Bus(e)
    }
}

/// LIS3DH driver
pub struct Lis3dh<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Lis3dh<I2C> {
    /// Create a driver for the part at `address`
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Verify the device ID and configure continuous sampling
    pub async fn init(&mut self) -> Result<(), Lis3dhError<I2C::Error>> {
        let id = self.read_register(reg::WHO_AM_I).await?;
        if id != DEVICE_ID {
            return Err(Lis3dhError::WrongDevice(id));
        }

        self.write_register(reg::CTRL_REG1, CTRL_REG1_100HZ_XYZ).await?;
        self.write_register(reg::CTRL_REG4, CTRL_REG4_BDU_HR_2G).await?;
        Ok(())
    }

    /// Read all three axes in milli-g
    pub async fn read_mg(&mut self) -> Result<Acceleration, Lis3dhError<I2C::Error>> {
        let mut raw = [0u8; 6];
        self.i2c
            .write_read(self.address, &[reg::OUT_X_L | AUTO_INCREMENT], &mut raw)
            .await?;
        Ok(decode_sample(&raw))
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    async fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut value = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut value)
            .await?;
        Ok(value[0])
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[register, value]).await
    }
}

/// Convert the six output bytes (X/Y/Z, little-endian) to milli-g
pub fn decode_sample(raw: &[u8; 6]) -> Acceleration {
    let axis = |lo: u8, hi: u8| i16::from_le_bytes([lo, hi]) >> 4;
    Acceleration {
        x: axis(raw[0], raw[1]),
        y: axis(raw[2], raw[3]),
        z: axis(raw[4], raw[5]),
    }
}
