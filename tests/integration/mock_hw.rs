//! Mock adapters for integration tests.
//!
//! Every mock records what the station did to it so tests can assert on the
//! full history without real GPIO, I2C or network. State that a test needs
//! after handing the mock to the station lives behind an `Rc`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Europe::London;

use heliostat::app::events::AppEvent;
use heliostat::app::ports::{ClockPort, EventSink, Platform, SensorDriver, StepDriver, TelemetryTransport};
use heliostat::drivers::stepper::Direction;
use heliostat::error::{InitError, MotionError, ReadError, TransportError};
use heliostat::sensors::bme280::AtmosphereReading;
use heliostat::sensors::{Reading, TelemetrySnapshot};

/// Local London wall time on 2025-06-21, as UTC.
pub fn solstice(hour: u32, minute: u32) -> DateTime<Utc> {
    London
        .with_ymd_and_hms(2025, 6, 21, hour, minute, 0)
        .single()
        .expect("unambiguous local time")
        .with_timezone(&Utc)
}

// ── Step driver ───────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct StepLog {
    pub pulses: u64,
    pub directions: Vec<Direction>,
    /// Fail every pulse once this many have succeeded.
    pub fail_after: Option<u64>,
    pub released: bool,
}

/// Step driver whose log outlives it. Hand the driver to the platform and
/// keep a [`probe`](Self::probe) to inspect what happened.
pub struct RecordingStepDriver {
    pub log: Rc<RefCell<StepLog>>,
    owner: bool,
}

impl RecordingStepDriver {
    pub fn new() -> Self {
        Self {
            log: Rc::default(),
            owner: true,
        }
    }

    pub fn failing_after(pulses: u64) -> Self {
        let d = Self::new();
        d.log.borrow_mut().fail_after = Some(pulses);
        d
    }

    /// Non-owning view onto the same log.
    pub fn probe(&self) -> Self {
        Self {
            log: Rc::clone(&self.log),
            owner: false,
        }
    }

    pub fn pulses(&self) -> u64 {
        self.log.borrow().pulses
    }

    pub fn released(&self) -> bool {
        self.log.borrow().released
    }
}

impl StepDriver for RecordingStepDriver {
    fn set_direction(&mut self, direction: Direction) -> Result<(), MotionError> {
        self.log.borrow_mut().directions.push(direction);
        Ok(())
    }

    fn pulse(&mut self) -> Result<(), MotionError> {
        let mut log = self.log.borrow_mut();
        if log.fail_after.is_some_and(|n| log.pulses >= n) {
            return Err(MotionError::PulseFailed {
                issued: 0,
                requested: 1,
            });
        }
        log.pulses += 1;
        Ok(())
    }
}

impl Drop for RecordingStepDriver {
    fn drop(&mut self) {
        if self.owner {
            self.log.borrow_mut().released = true;
        }
    }
}

// ── Sensors ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct ScriptedSensor {
    pub name: &'static str,
    pub init_ok: bool,
    pub read_ok: Rc<Cell<bool>>,
    pub init_calls: Rc<Cell<u32>>,
}

impl ScriptedSensor {
    pub fn healthy(name: &'static str) -> Self {
        Self {
            name,
            init_ok: true,
            read_ok: Rc::new(Cell::new(true)),
            init_calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn dead(name: &'static str) -> Self {
        Self {
            init_ok: false,
            ..Self::healthy(name)
        }
    }
}

impl SensorDriver for ScriptedSensor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn initialize(&mut self) -> Result<(), InitError> {
        self.init_calls.set(self.init_calls.get() + 1);
        if self.init_ok {
            Ok(())
        } else {
            Err(InitError::DeviceNotResponding(self.name))
        }
    }

    fn read(&mut self) -> Result<Reading, ReadError> {
        if !self.read_ok.get() {
            return Err(ReadError::Bus(self.name));
        }
        Ok(Reading::Atmosphere(AtmosphereReading {
            temperature: 21.5,
            pressure: 1013.0,
            humidity: 40.0,
        }))
    }
}

pub fn five_healthy() -> Vec<ScriptedSensor> {
    ["bme280", "tsl2591", "ltr390", "icm20948", "sgp40"]
        .into_iter()
        .map(ScriptedSensor::healthy)
        .collect()
}

// ── Platform ──────────────────────────────────────────────────

pub struct MockPlatform {
    pub stepper: Option<RecordingStepDriver>,
    pub sensors: Vec<ScriptedSensor>,
    pub bus_ok: bool,
    pub step_requests: u32,
    pub sensor_requests: u32,
}

impl MockPlatform {
    pub fn new(stepper: RecordingStepDriver, sensors: Vec<ScriptedSensor>) -> Self {
        Self {
            stepper: Some(stepper),
            sensors,
            bus_ok: true,
            step_requests: 0,
            sensor_requests: 0,
        }
    }

    pub fn without_stepper(sensors: Vec<ScriptedSensor>) -> Self {
        Self {
            stepper: None,
            ..Self::new(RecordingStepDriver::new(), sensors)
        }
    }
}

impl Platform for MockPlatform {
    fn step_driver(&mut self) -> Result<Box<dyn StepDriver>, InitError> {
        self.step_requests += 1;
        match self.stepper.take() {
            Some(d) => Ok(Box::new(d)),
            None => Err(InitError::GpioUnavailable(20)),
        }
    }

    fn sensors(&mut self) -> Result<Vec<Box<dyn SensorDriver>>, InitError> {
        self.sensor_requests += 1;
        if !self.bus_ok {
            return Err(InitError::BusUnavailable);
        }
        Ok(self
            .sensors
            .iter()
            .cloned()
            .map(|s| Box::new(s) as Box<dyn SensorDriver>)
            .collect())
    }
}

// ── Transport ─────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Vec<TelemetrySnapshot>,
    pub fail_with: Option<TransportError>,
}

impl TelemetryTransport for RecordingTransport {
    fn send(&mut self, snapshot: &TelemetrySnapshot) -> Result<(), TransportError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.sent.push(snapshot.clone());
        Ok(())
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Manual clock. `sleep` advances time instead of blocking.
#[derive(Clone)]
pub struct ManualClock {
    pub now: Rc<Cell<DateTime<Utc>>>,
    pub sleeps: Rc<RefCell<Vec<Duration>>>,
}

impl ManualClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
            sleeps: Rc::default(),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.now.set(at);
    }
}

impl ClockPort for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        let advanced = self.now.get() + chrono::Duration::from_std(duration).unwrap_or_default();
        self.now.set(advanced);
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn abandoned(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::CycleAbandoned(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
