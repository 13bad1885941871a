//! Hardware adapters: bring-up of the physical peripherals behind the
//! [`Platform`] port.
//!
//! [`RpiPlatform`] (feature `rpi`) opens the Linux I2C device and the GPIO
//! character device. [`NoHardware`] is what builds without that feature
//! get: every bring-up fails with [`InitError::Unsupported`], which the
//! station answers by entering full mock mode. This is the only module in
//! the system that touches actual hardware.

use crate::app::ports::{Platform, SensorDriver, StepDriver};
use crate::error::InitError;

/// Platform with no peripherals at all.
#[derive(Debug, Default)]
pub struct NoHardware;

impl Platform for NoHardware {
    fn step_driver(&mut self) -> Result<Box<dyn StepDriver>, InitError> {
        Err(InitError::Unsupported)
    }

    fn sensors(&mut self) -> Result<Vec<Box<dyn SensorDriver>>, InitError> {
        Err(InitError::Unsupported)
    }
}

#[cfg(feature = "rpi")]
pub use rpi::RpiPlatform;

#[cfg(feature = "rpi")]
mod rpi {
    use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
    use linux_embedded_hal::{CdevPin, Delay, I2cdev};
    use log::{info, warn};

    use crate::app::ports::{Platform, SensorDriver, StepDriver};
    use crate::config::StationConfig;
    use crate::drivers::stepper::{GpioStepDriver, PulseTiming};
    use crate::error::InitError;
    use crate::pins;
    use crate::sensors::bme280::Bme280;
    use crate::sensors::bus::SharedI2c;
    use crate::sensors::icm20948::Icm20948;
    use crate::sensors::ltr390::Ltr390;
    use crate::sensors::sgp40::Sgp40;
    use crate::sensors::tsl2591::Tsl2591;

    /// Raspberry Pi peripherals via `/dev/i2c-*` and `/dev/gpiochip*`.
    pub struct RpiPlatform {
        i2c_bus: String,
        gpio_chip: String,
    }

    impl RpiPlatform {
        pub fn new(config: &StationConfig) -> Self {
            Self {
                i2c_bus: config.i2c_bus.clone(),
                gpio_chip: config.gpio_chip.clone(),
            }
        }
    }

    fn output_line(chip: &mut Chip, offset: u32) -> Result<CdevPin, InitError> {
        let fail = |e: &dyn std::fmt::Display| {
            warn!("GPIO line {} unavailable: {}", offset, e);
            InitError::GpioUnavailable(offset)
        };
        let line = chip.get_line(offset).map_err(|e| fail(&e))?;
        let handle = line
            .request(LineRequestFlags::OUTPUT, 0, pins::GPIO_CONSUMER)
            .map_err(|e| fail(&e))?;
        CdevPin::new(handle).map_err(|e| fail(&e))
    }

    impl Platform for RpiPlatform {
        fn step_driver(&mut self) -> Result<Box<dyn StepDriver>, InitError> {
            let mut chip = Chip::new(&self.gpio_chip).map_err(|e| {
                warn!("Cannot open {}: {}", self.gpio_chip, e);
                InitError::GpioUnavailable(pins::STEPPER_DIR_LINE)
            })?;
            let dir = output_line(&mut chip, pins::STEPPER_DIR_LINE)?;
            let step = output_line(&mut chip, pins::STEPPER_STEP_LINE)?;
            let enable = output_line(&mut chip, pins::STEPPER_ENABLE_LINE)?;
            let driver = GpioStepDriver::new(dir, step, enable, Delay, PulseTiming::default())?;
            info!(
                "Stepper on {} (DIR={}, STEP={}, EN={})",
                self.gpio_chip,
                pins::STEPPER_DIR_LINE,
                pins::STEPPER_STEP_LINE,
                pins::STEPPER_ENABLE_LINE
            );
            Ok(Box::new(driver))
        }

        fn sensors(&mut self) -> Result<Vec<Box<dyn SensorDriver>>, InitError> {
            let dev = I2cdev::new(&self.i2c_bus).map_err(|e| {
                warn!("Cannot open {}: {}", self.i2c_bus, e);
                InitError::BusUnavailable
            })?;
            let bus = SharedI2c::new(dev);
            let drivers: Vec<Box<dyn SensorDriver>> = vec![
                Box::new(Bme280::new(bus.clone(), pins::BME280_ADDR)),
                Box::new(Tsl2591::new(bus.clone(), Delay, pins::TSL2591_ADDR)),
                Box::new(Ltr390::new(bus.clone(), Delay, pins::LTR390_ADDR)),
                Box::new(Icm20948::new(bus.clone(), Delay, pins::ICM20948_ADDR)),
                Box::new(Sgp40::new(bus, Delay, pins::SGP40_ADDR)),
            ];
            info!("Sensor bus {} opened ({} sensors)", self.i2c_bus, drivers.len());
            Ok(drivers)
        }
    }
}
