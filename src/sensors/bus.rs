//! Shared I2C bus and SMBus-style register helpers.
//!
//! All five sensors hang off one bus. [`SharedI2c`] hands each driver its own
//! handle onto the same underlying device; the control loop is
//! single-threaded so a `RefCell` borrow per transaction is enough.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::i2c::{self, ErrorType, I2c, Operation};
use log::debug;

use crate::error::{InitError, ReadError};

/// Cloneable handle onto a single I2C bus.
pub struct SharedI2c<I2C> {
    bus: Rc<RefCell<I2C>>,
}

impl<I2C> SharedI2c<I2C> {
    pub fn new(bus: I2C) -> Self {
        Self {
            bus: Rc::new(RefCell::new(bus)),
        }
    }
}

impl<I2C> Clone for SharedI2c<I2C> {
    fn clone(&self) -> Self {
        Self {
            bus: Rc::clone(&self.bus),
        }
    }
}

impl<I2C: I2c> ErrorType for SharedI2c<I2C> {
    type Error = I2C::Error;
}

impl<I2C: I2c> I2c for SharedI2c<I2C> {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.bus.borrow_mut().transaction(address, operations)
    }
}

// ── Register helpers ──────────────────────────────────────────

/// Write one byte to a register (SMBus "write byte data").
pub(crate) fn write_reg<I2C: I2c>(
    i2c: &mut I2C,
    address: u8,
    reg: u8,
    value: u8,
) -> Result<(), I2C::Error> {
    i2c.write(address, &[reg, value])
}

/// Read a block starting at `reg` (SMBus "read I2C block data").
pub(crate) fn read_block<I2C: I2c>(
    i2c: &mut I2C,
    address: u8,
    reg: u8,
    buf: &mut [u8],
) -> Result<(), I2C::Error> {
    i2c.write_read(address, &[reg], buf)
}

pub(crate) fn init_fault<E: i2c::Error>(sensor: &'static str, e: &E) -> InitError {
    debug!("{}: init transaction failed ({:?})", sensor, e.kind());
    InitError::DeviceNotResponding(sensor)
}

pub(crate) fn read_fault<E: i2c::Error>(sensor: &'static str, e: &E) -> ReadError {
    debug!("{}: read transaction failed ({:?})", sensor, e.kind());
    ReadError::Bus(sensor)
}
