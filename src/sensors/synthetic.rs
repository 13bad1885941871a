//! Synthetic sensors for full mock mode.
//!
//! Each unit reports under the same name as its hardware counterpart so the
//! telemetry schema does not change between modes. Values are drawn
//! uniformly from plausible ranges; they carry no physical correlation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::ports::SensorDriver;
use crate::error::{InitError, ReadError};

use super::Reading;
use super::bme280::{self, AtmosphereReading};
use super::icm20948::{self, Axes, MotionReading};
use super::ltr390::{self, UvReading};
use super::sgp40::{self, VocReading};
use super::tsl2591::{self, LightReading};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Atmosphere,
    Light,
    Ultraviolet,
    Motion,
    AirQuality,
}

impl SensorKind {
    pub const ALL: [Self; 5] = [
        Self::Atmosphere,
        Self::Light,
        Self::Ultraviolet,
        Self::Motion,
        Self::AirQuality,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Atmosphere => bme280::NAME,
            Self::Light => tsl2591::NAME,
            Self::Ultraviolet => ltr390::NAME,
            Self::Motion => icm20948::NAME,
            Self::AirQuality => sgp40::NAME,
        }
    }
}

pub struct SyntheticSensor {
    kind: SensorKind,
    rng: StdRng,
}

impl SyntheticSensor {
    pub fn new(kind: SensorKind, seed: u64) -> Self {
        Self {
            kind,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

fn axes(rng: &mut StdRng, limit: f64) -> Axes {
    Axes {
        x: rng.random_range(-limit..=limit),
        y: rng.random_range(-limit..=limit),
        z: rng.random_range(-limit..=limit),
    }
}

impl SensorDriver for SyntheticSensor {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn initialize(&mut self) -> Result<(), InitError> {
        Ok(())
    }

    fn read(&mut self) -> Result<Reading, ReadError> {
        let rng = &mut self.rng;
        let reading = match self.kind {
            SensorKind::Atmosphere => Reading::Atmosphere(AtmosphereReading {
                temperature: rng.random_range(20.0..=30.0),
                pressure: rng.random_range(980.0..=1020.0),
                humidity: rng.random_range(30.0..=70.0),
            }),
            SensorKind::Light => Reading::Light(LightReading {
                visible_light: rng.random_range(100.0..=1000.0),
                ir_light: rng.random_range(50.0..=500.0),
                lux: rng.random_range(0.0..=1000.0),
            }),
            SensorKind::Ultraviolet => Reading::Ultraviolet(UvReading {
                uv_raw: rng.random_range(0.0..=10_000.0),
                uv_index: rng.random_range(0.0..=11.0),
            }),
            SensorKind::Motion => Reading::Motion(MotionReading {
                accelerometer: axes(rng, 4.0),
                gyroscope: axes(rng, 2000.0),
            }),
            SensorKind::AirQuality => Reading::AirQuality(VocReading {
                voc_raw: rng.random_range(0.0..=65_535.0),
                voc_index: rng.random_range(0.0..=500.0),
            }),
        };
        Ok(reading)
    }
}
