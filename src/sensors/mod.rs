//! Sensor subsystem: individual drivers and the aggregating [`SensorFleet`].
//!
//! The fleet owns every sensor driver. Each one is initialized on its own;
//! a unit that fails to come up is left out of the active set and reported
//! as unavailable for the life of the process. `read_all` always returns an
//! entry for every configured sensor.

pub mod bme280;
pub mod bus;
pub mod icm20948;
pub mod ltr390;
pub mod sgp40;
pub mod synthetic;
pub mod tsl2591;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::app::ports::SensorDriver;
use crate::solar::Location;
use bme280::AtmosphereReading;
use icm20948::MotionReading;
use ltr390::UvReading;
use sgp40::VocReading;
use synthetic::{SensorKind, SyntheticSensor};
use tsl2591::LightReading;

/// One structured sample from a single sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reading {
    Atmosphere(AtmosphereReading),
    Light(LightReading),
    Ultraviolet(UvReading),
    Motion(MotionReading),
    AirQuality(VocReading),
}

/// Sensor name → reading, `None` when the unit is unavailable this cycle.
pub type SensorReadings = BTreeMap<&'static str, Option<Reading>>;

/// Outcome of [`SensorFleet::initialize_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetStatus {
    pub configured: usize,
    pub active: usize,
}

impl FleetStatus {
    /// No sensor survived initialization.
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    pub fn is_complete(&self) -> bool {
        self.active == self.configured
    }
}

/// Aggregates all sensor drivers and produces per-sensor readings.
pub struct SensorFleet {
    configured: Vec<&'static str>,
    pending: Vec<Box<dyn SensorDriver>>,
    active: Vec<Box<dyn SensorDriver>>,
}

impl SensorFleet {
    /// Construct a fleet. Nothing touches hardware until
    /// [`initialize_all`](Self::initialize_all).
    pub fn new(drivers: Vec<Box<dyn SensorDriver>>) -> Self {
        Self {
            configured: drivers.iter().map(|d| d.name()).collect(),
            pending: drivers,
            active: Vec::new(),
        }
    }

    /// The five synthetic sensors, already initialized.
    pub fn synthetic(seed: u64) -> Self {
        let drivers = SensorKind::ALL
            .iter()
            .zip(0u64..)
            .map(|(&kind, i)| Box::new(SyntheticSensor::new(kind, seed.wrapping_add(i))) as Box<dyn SensorDriver>)
            .collect();
        let mut fleet = Self::new(drivers);
        fleet.initialize_all();
        fleet
    }

    /// Bring up every pending driver independently. Never fails; callers
    /// inspect the returned status.
    pub fn initialize_all(&mut self) -> FleetStatus {
        for mut driver in self.pending.drain(..) {
            match driver.initialize() {
                Ok(()) => {
                    info!("Sensor {} initialized", driver.name());
                    self.active.push(driver);
                }
                Err(e) => warn!("Sensor {} unavailable: {}", driver.name(), e),
            }
        }
        let status = self.status();
        info!("Sensor fleet: {}/{} active", status.active, status.configured);
        status
    }

    pub fn status(&self) -> FleetStatus {
        FleetStatus {
            configured: self.configured.len(),
            active: self.active.len(),
        }
    }

    pub fn configured(&self) -> &[&'static str] {
        &self.configured
    }

    pub fn active_names(&self) -> Vec<&'static str> {
        self.active.iter().map(|d| d.name()).collect()
    }

    /// Read every active sensor. A failed read is logged and recorded as
    /// unavailable; the remaining sensors are still read.
    pub fn read_all(&mut self) -> SensorReadings {
        let mut readings: SensorReadings = self.configured.iter().map(|&name| (name, None)).collect();
        for driver in &mut self.active {
            match driver.read() {
                Ok(reading) => {
                    readings.insert(driver.name(), Some(reading));
                }
                Err(e) => warn!("Sensor {} read failed: {}", driver.name(), e),
            }
        }
        readings
    }
}

/// One telemetry record as delivered to the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    pub device_id: String,
    pub location: Location,
    #[serde(flatten)]
    pub readings: SensorReadings,
}

impl TelemetrySnapshot {
    pub fn new(at: DateTime<Utc>, device_id: &str, location: Location, readings: SensorReadings) -> Self {
        Self {
            timestamp: at.timestamp_millis() as f64 / 1000.0,
            device_id: device_id.to_owned(),
            location,
            readings,
        }
    }

    /// Number of sensors that produced a reading.
    pub fn available(&self) -> usize {
        self.readings.values().filter(|r| r.is_some()).count()
    }
}
