//! Bosch BME280 temperature / pressure / humidity sensor.
//!
//! Configured for x1 oversampling on every channel, normal mode, 500 ms
//! standby, filter off. Compensation uses simplified linear scalings of the
//! raw ADC words rather than the datasheet trimming polynomials.

use embedded_hal::i2c::I2c;
use serde::Serialize;

use crate::app::ports::SensorDriver;
use crate::error::{InitError, ReadError};

use super::Reading;
use super::bus::{init_fault, read_block, read_fault, write_reg};

pub const NAME: &str = "bme280";

const REG_CALIB: u8 = 0x88;
const REG_CTRL_HUM: u8 = 0xF2;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_CONFIG: u8 = 0xF5;
const REG_DATA: u8 = 0xF7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AtmosphereReading {
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
}

pub struct Bme280<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Bme280<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    fn decode(data: &[u8; 8]) -> AtmosphereReading {
        let press_raw = (u32::from(data[0]) << 12) | (u32::from(data[1]) << 4) | (u32::from(data[2]) >> 4);
        let temp_raw = (u32::from(data[3]) << 12) | (u32::from(data[4]) << 4) | (u32::from(data[5]) >> 4);
        let hum_raw = (u32::from(data[6]) << 8) | u32::from(data[7]);
        AtmosphereReading {
            temperature: compensate_temperature(temp_raw),
            pressure: compensate_pressure(press_raw),
            humidity: compensate_humidity(hum_raw),
        }
    }
}

impl<I2C: I2c> SensorDriver for Bme280<I2C> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn initialize(&mut self) -> Result<(), InitError> {
        let steps = [
            (REG_CTRL_HUM, 0x01),  // humidity x1
            (REG_CTRL_MEAS, 0x27), // temp/pressure x1, normal mode
            (REG_CONFIG, 0xA0),    // 500 ms standby, filter off
        ];
        for (reg, value) in steps {
            write_reg(&mut self.i2c, self.address, reg, value).map_err(|e| init_fault(NAME, &e))?;
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Reading, ReadError> {
        // The calibration block is fetched but the simplified compensation
        // does not consume it.
        let mut calib = [0u8; 24];
        read_block(&mut self.i2c, self.address, REG_CALIB, &mut calib)
            .map_err(|e| read_fault(NAME, &e))?;

        let mut data = [0u8; 8];
        read_block(&mut self.i2c, self.address, REG_DATA, &mut data)
            .map_err(|e| read_fault(NAME, &e))?;

        Ok(Reading::Atmosphere(Self::decode(&data)))
    }
}

fn compensate_temperature(raw: u32) -> f64 {
    (f64::from(raw) / 16384.0) * (100.0 / 16384.0)
}

fn compensate_pressure(raw: u32) -> f64 {
    f64::from(raw) / 256.0
}

fn compensate_humidity(raw: u32) -> f64 {
    f64::from(raw) / 1024.0
}
