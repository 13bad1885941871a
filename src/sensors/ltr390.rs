//! Lite-On LTR390 UV sensor.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use serde::Serialize;

use crate::app::ports::SensorDriver;
use crate::error::{InitError, ReadError};

use super::Reading;
use super::bus::{init_fault, read_block, read_fault, write_reg};

pub const NAME: &str = "ltr390";

const REG_MAIN_CTRL: u8 = 0x00;
const REG_GAIN: u8 = 0x04;
const REG_UVS_DATA: u8 = 0x0C;
const SETTLE_MS: u32 = 100;
/// Counts per UV-index unit in the simplified conversion.
const UV_SENSITIVITY: f64 = 2300.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UvReading {
    pub uv_raw: f64,
    pub uv_index: f64,
}

pub struct Ltr390<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Ltr390<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }
}

impl<I2C: I2c, D: DelayNs> SensorDriver for Ltr390<I2C, D> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn initialize(&mut self) -> Result<(), InitError> {
        // UV mode + enable, then gain/resolution.
        write_reg(&mut self.i2c, self.address, REG_MAIN_CTRL, 0x0A).map_err(|e| init_fault(NAME, &e))?;
        write_reg(&mut self.i2c, self.address, REG_GAIN, 0x02).map_err(|e| init_fault(NAME, &e))?;
        self.delay.delay_ms(SETTLE_MS);
        Ok(())
    }

    fn read(&mut self) -> Result<Reading, ReadError> {
        let mut data = [0u8; 3];
        read_block(&mut self.i2c, self.address, REG_UVS_DATA, &mut data)
            .map_err(|e| read_fault(NAME, &e))?;

        let raw = u32::from_le_bytes([data[0], data[1], data[2], 0]);
        Ok(Reading::Ultraviolet(UvReading {
            uv_raw: f64::from(raw),
            uv_index: f64::from(raw) / UV_SENSITIVITY,
        }))
    }
}
