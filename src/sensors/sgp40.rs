//! Sensirion SGP40 VOC sensor.
//!
//! The VOC index here is a linear rescale of the raw ticks onto 0–500, not
//! Sensirion's gas-index algorithm.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use serde::Serialize;

use crate::app::ports::SensorDriver;
use crate::error::{InitError, ReadError};

use super::Reading;
use super::bus::{init_fault, read_block, read_fault};

pub const NAME: &str = "sgp40";

const CMD_INIT: [u8; 2] = [0x20, 0x03];
const CMD_MEASURE: [u8; 2] = [0x26, 0x0F];
const REG_RESULT: u8 = 0x00;
const INIT_SETTLE_MS: u32 = 100;
const MEASURE_MS: u32 = 50;
const VOC_INDEX_MAX: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VocReading {
    pub voc_raw: f64,
    pub voc_index: f64,
}

pub struct Sgp40<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Sgp40<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }
}

impl<I2C: I2c, D: DelayNs> SensorDriver for Sgp40<I2C, D> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn initialize(&mut self) -> Result<(), InitError> {
        self.i2c
            .write(self.address, &CMD_INIT)
            .map_err(|e| init_fault(NAME, &e))?;
        self.delay.delay_ms(INIT_SETTLE_MS);
        Ok(())
    }

    fn read(&mut self) -> Result<Reading, ReadError> {
        self.i2c
            .write(self.address, &CMD_MEASURE)
            .map_err(|e| read_fault(NAME, &e))?;
        self.delay.delay_ms(MEASURE_MS);

        let mut data = [0u8; 3];
        read_block(&mut self.i2c, self.address, REG_RESULT, &mut data)
            .map_err(|e| read_fault(NAME, &e))?;

        let raw = u16::from_be_bytes([data[0], data[1]]);
        Ok(Reading::AirQuality(VocReading {
            voc_raw: f64::from(raw),
            voc_index: f64::from(voc_index(raw)),
        }))
    }
}

fn voc_index(raw: u16) -> u32 {
    let scaled = (f64::from(raw) / f64::from(u16::MAX) * f64::from(VOC_INDEX_MAX)) as u32;
    scaled.min(VOC_INDEX_MAX)
}
