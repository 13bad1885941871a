//! AMS TSL2591 ambient light sensor (visible + IR photodiodes).

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use serde::Serialize;

use crate::app::ports::SensorDriver;
use crate::error::{InitError, ReadError};

use super::Reading;
use super::bus::{init_fault, read_block, read_fault, write_reg};

pub const NAME: &str = "tsl2591";

const REG_ENABLE: u8 = 0xA0;
const REG_CONTROL: u8 = 0xA1;
const REG_C0DATAL: u8 = 0xB4;
const SETTLE_MS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightReading {
    pub visible_light: f64,
    pub ir_light: f64,
    pub lux: f64,
}

pub struct Tsl2591<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Tsl2591<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }
}

impl<I2C: I2c, D: DelayNs> SensorDriver for Tsl2591<I2C, D> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn initialize(&mut self) -> Result<(), InitError> {
        write_reg(&mut self.i2c, self.address, REG_ENABLE, 0x03).map_err(|e| init_fault(NAME, &e))?;
        write_reg(&mut self.i2c, self.address, REG_CONTROL, 0x12).map_err(|e| init_fault(NAME, &e))?;
        self.delay.delay_ms(SETTLE_MS);
        Ok(())
    }

    fn read(&mut self) -> Result<Reading, ReadError> {
        let mut data = [0u8; 4];
        read_block(&mut self.i2c, self.address, REG_C0DATAL, &mut data)
            .map_err(|e| read_fault(NAME, &e))?;

        let ch0 = u16::from_le_bytes([data[0], data[1]]);
        let ch1 = u16::from_le_bytes([data[2], data[3]]);
        Ok(Reading::Light(LightReading {
            visible_light: f64::from(ch0),
            ir_light: f64::from(ch1),
            lux: lux(ch0, ch1),
        }))
    }
}

/// Simplified lux: scaled visible-minus-IR difference. Goes negative when
/// IR dominates; kept as-is.
fn lux(ch0: u16, ch1: u16) -> f64 {
    (f64::from(ch0) - f64::from(ch1)) * 0.6
}
