//! TDK ICM-20948 accelerometer / gyroscope.
//!
//! Only bank-0 registers are touched. Raw words are treated as unsigned and
//! scaled for the ±4 g and ±2000 °/s ranges.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use serde::Serialize;

use crate::app::ports::SensorDriver;
use crate::error::{InitError, ReadError};

use super::Reading;
use super::bus::{init_fault, read_block, read_fault, write_reg};

pub const NAME: &str = "icm20948";

const REG_PWR_MGMT_1: u8 = 0x06;
const REG_PWR_MGMT_2: u8 = 0x07;
const REG_ACCEL_XOUT_H: u8 = 0x2D;
const REG_GYRO_XOUT_H: u8 = 0x33;
const SETTLE_MS: u32 = 100;

const ACCEL_FULL_SCALE_G: f64 = 4.0;
const GYRO_FULL_SCALE_DPS: f64 = 2000.0;
const RAW_FULL_SCALE: f64 = 32768.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Axes {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionReading {
    pub accelerometer: Axes,
    pub gyroscope: Axes,
}

pub struct Icm20948<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Icm20948<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    fn read_axes(&mut self, reg: u8, full_scale: f64) -> Result<Axes, ReadError> {
        let mut data = [0u8; 6];
        read_block(&mut self.i2c, self.address, reg, &mut data).map_err(|e| read_fault(NAME, &e))?;
        let word = |i: usize| f64::from(u16::from_be_bytes([data[i], data[i + 1]]));
        Ok(Axes {
            x: word(0) * full_scale / RAW_FULL_SCALE,
            y: word(2) * full_scale / RAW_FULL_SCALE,
            z: word(4) * full_scale / RAW_FULL_SCALE,
        })
    }
}

impl<I2C: I2c, D: DelayNs> SensorDriver for Icm20948<I2C, D> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn initialize(&mut self) -> Result<(), InitError> {
        // Wake, then enable every accel/gyro axis.
        write_reg(&mut self.i2c, self.address, REG_PWR_MGMT_1, 0x00).map_err(|e| init_fault(NAME, &e))?;
        write_reg(&mut self.i2c, self.address, REG_PWR_MGMT_2, 0x00).map_err(|e| init_fault(NAME, &e))?;
        self.delay.delay_ms(SETTLE_MS);
        Ok(())
    }

    fn read(&mut self) -> Result<Reading, ReadError> {
        let accelerometer = self.read_axes(REG_ACCEL_XOUT_H, ACCEL_FULL_SCALE_G)?;
        let gyroscope = self.read_axes(REG_GYRO_XOUT_H, GYRO_FULL_SCALE_DPS)?;
        Ok(Reading::Motion(MotionReading {
            accelerometer,
            gyroscope,
        }))
    }
}
