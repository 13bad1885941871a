//! Station service: the hexagonal core.
//!
//! [`Station`] owns the sun predictor, the panel actuator and the sensor
//! fleet. It exposes a hardware-agnostic control cycle; all I/O flows
//! through port traits, so the whole service runs against mock adapters in
//! tests.
//!
//! ```text
//!  Platform ──▶ ┌────────────────────────────┐ ──▶ TelemetryTransport
//!  ClockPort ─▶ │          Station           │ ──▶ EventSink
//!               │ Predictor · Actuator · Fleet│
//!               └────────────────────────────┘
//! ```

use core::fmt;
use std::time::Duration;

use log::{error, info, warn};
use serde::Serialize;

use crate::config::StationConfig;
use crate::drivers::stepper::{Motion, NullStepDriver, PanelActuator};
use crate::error::Error;
use crate::sensors::{SensorFleet, TelemetrySnapshot};
use crate::solar::{NormalizedPosition, SunPredictor};

use super::events::{AppEvent, TelemetrySummary};
use super::ports::{ClockPort, EventSink, Platform, StepDriver, TelemetryTransport};

/// How the station is wired, fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SystemMode {
    /// Real sensors and stepper.
    Hardware,
    /// Synthetic sensors and a no-op stepper.
    FullMock,
}

impl fmt::Display for SystemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hardware => write!(f, "hardware"),
            Self::FullMock => write!(f, "mock"),
        }
    }
}

/// Result of one completed control cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle: u64,
    pub target: NormalizedPosition,
    pub motion: Motion,
    pub snapshot: TelemetrySnapshot,
    /// `false` when the transport gave up on the snapshot.
    pub delivered: bool,
}

// ───────────────────────────────────────────────────────────────
// Station
// ───────────────────────────────────────────────────────────────

pub struct Station<C, T> {
    config: StationConfig,
    mode: SystemMode,
    predictor: SunPredictor,
    actuator: PanelActuator<Box<dyn StepDriver>>,
    fleet: SensorFleet,
    clock: C,
    transport: T,
    cycles: u64,
}

impl<C: ClockPort, T: TelemetryTransport> Station<C, T> {
    /// Bring up the station.
    ///
    /// Unless `config.use_mock` is set, the platform is asked for the step
    /// driver and the sensors. If the step driver cannot be acquired or no
    /// sensor initializes, the station runs in [`SystemMode::FullMock`]
    /// for its whole lifetime, discarding any partial hardware.
    pub fn start(
        config: StationConfig,
        platform: &mut impl Platform,
        clock: C,
        transport: T,
        sink: &mut impl EventSink,
    ) -> Self {
        let predictor = SunPredictor::new(config.location, config.timezone);

        let hardware = if config.use_mock {
            info!("Mock mode requested by configuration");
            None
        } else {
            bring_up(platform)
        };

        let (mode, driver, fleet) = match hardware {
            Some((driver, fleet)) => (SystemMode::Hardware, driver, fleet),
            None => {
                let seed = clock.now().timestamp_millis() as u64;
                let driver: Box<dyn StepDriver> = Box::new(NullStepDriver::new());
                (SystemMode::FullMock, driver, SensorFleet::synthetic(seed))
            }
        };

        let status = fleet.status();
        info!(
            "Station {} started in {} mode ({} predictor, {}/{} sensors)",
            config.device_id,
            mode,
            predictor.mode(),
            status.active,
            status.configured
        );
        info!("Sending data to: {}", config.endpoint_url);
        info!("Reading interval: {} seconds", config.read_interval_secs);
        sink.emit(&AppEvent::Started {
            mode,
            predictor: predictor.mode(),
            active_sensors: status.active,
            configured_sensors: status.configured,
        });

        Self {
            config,
            mode,
            predictor,
            actuator: PanelActuator::new(driver),
            fleet,
            clock,
            transport,
            cycles: 0,
        }
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one control cycle: predict → move → read → deliver.
    ///
    /// A motion fault abandons the cycle before any telemetry is taken. A
    /// delivery failure does not: the report comes back with
    /// `delivered == false`.
    pub fn run_cycle(&mut self, sink: &mut impl EventSink) -> Result<CycleReport, Error> {
        self.cycles += 1;
        let now = self.clock.now();

        // 1. Where should the panel point?
        let target = self.predictor.get_position(now);

        // 2. Drive it there
        let motion = match self.actuator.move_to(target) {
            Ok(m) => m,
            Err(e) => {
                let err = Error::from(e);
                error!("Cycle {} abandoned: {}", self.cycles, err);
                sink.emit(&AppEvent::CycleAbandoned(err));
                return Err(err);
            }
        };
        sink.emit(&AppEvent::PanelMoved {
            target,
            motion,
            position: self.actuator.position(),
        });

        // 3. Sample every sensor
        let readings = self.fleet.read_all();
        let snapshot = TelemetrySnapshot::new(now, &self.config.device_id, self.config.location, readings);

        // 4. Ship it
        let delivered = match self.transport.send(&snapshot) {
            Ok(()) => {
                info!("Data sent successfully to {}", self.config.endpoint_url);
                true
            }
            Err(e) => {
                error!("Failed to send data to endpoint: {}", e);
                false
            }
        };
        sink.emit(&AppEvent::Telemetry(TelemetrySummary {
            cycle: self.cycles,
            timestamp: snapshot.timestamp,
            available: snapshot.available(),
            configured: self.fleet.configured().len(),
            delivered,
        }));

        Ok(CycleReport {
            cycle: self.cycles,
            target,
            motion,
            snapshot,
            delivered,
        })
    }

    /// Cycle until `keep_running` says stop or `max_cycles` is reached.
    /// Sleeps `read_interval` after a completed cycle and `retry_delay`
    /// after an abandoned one. Returns the number of cycles run.
    pub fn run(&mut self, sink: &mut impl EventSink, mut keep_running: impl FnMut() -> bool) -> u64 {
        let interval = Duration::from_secs(self.config.read_interval_secs);
        let retry = Duration::from_secs(self.config.retry_delay_secs);
        let mut ran = 0;

        while keep_running() && !self.limit_reached() {
            let pause = match self.run_cycle(sink) {
                Ok(_) => interval,
                Err(_) => {
                    warn!("Retrying in {} s", retry.as_secs());
                    retry
                }
            };
            ran += 1;
            if self.limit_reached() {
                break;
            }
            self.clock.sleep(pause);
        }

        info!("Station stopping after {} cycles", ran);
        ran
    }

    fn limit_reached(&self) -> bool {
        self.config.max_cycles.is_some_and(|max| self.cycles >= max)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> SystemMode {
        self.mode
    }

    pub fn predictor(&self) -> &SunPredictor {
        &self.predictor
    }

    pub fn panel_position(&self) -> u32 {
        self.actuator.position()
    }

    pub fn fleet(&self) -> &SensorFleet {
        &self.fleet
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

/// Acquire the stepper, then the sensors. `None` means full mock.
fn bring_up(platform: &mut impl Platform) -> Option<(Box<dyn StepDriver>, SensorFleet)> {
    let driver = match platform.step_driver() {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to initialize stepper: {}; falling back to mock mode", e);
            return None;
        }
    };
    info!("Stepper motor controller initialized");

    let mut fleet = match platform.sensors() {
        Ok(drivers) => SensorFleet::new(drivers),
        Err(e) => {
            error!("Failed to open sensor bus: {}; falling back to mock mode", e);
            return None;
        }
    };
    if fleet.initialize_all().is_empty() {
        error!("No sensor initialized; falling back to mock mode");
        return None;
    }
    Some((driver, fleet))
}
