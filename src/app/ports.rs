//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Station (domain)
//! ```
//!
//! Driven adapters (sensor chips, the step driver, the telemetry uplink,
//! the wall clock, event sinks) implement these traits. The
//! [`Station`](super::service::Station) consumes them through generics and
//! trait objects, so the control cycle never touches hardware directly.
//! Hardware versus mock is decided once, by which adapter is plugged in.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::drivers::stepper::Direction;
use crate::error::{InitError, MotionError, ReadError, TransportError};
use crate::sensors::{Reading, TelemetrySnapshot};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One environmental sensor.
pub trait SensorDriver {
    /// Stable key used in telemetry.
    fn name(&self) -> &'static str;

    /// Configure the device. Called once, before any `read`.
    fn initialize(&mut self) -> Result<(), InitError>;

    /// Take one sample.
    fn read(&mut self) -> Result<Reading, ReadError>;
}

// ───────────────────────────────────────────────────────────────
// Step driver port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Low-level stepper interface: a direction line and a step pulse.
///
/// Pulse timing belongs to the implementation. A driver that owns a
/// physical enable line releases it when dropped.
pub trait StepDriver {
    fn set_direction(&mut self, direction: Direction) -> Result<(), MotionError>;

    /// Emit one full step pulse. `MotionError::PulseFailed` counts are
    /// filled in by the caller.
    fn pulse(&mut self) -> Result<(), MotionError>;
}

impl<D: StepDriver + ?Sized> StepDriver for Box<D> {
    fn set_direction(&mut self, direction: Direction) -> Result<(), MotionError> {
        (**self).set_direction(direction)
    }

    fn pulse(&mut self) -> Result<(), MotionError> {
        (**self).pulse()
    }
}

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: domain → network)
// ───────────────────────────────────────────────────────────────

/// Delivers a telemetry snapshot. Retries, if any, happen inside.
pub trait TelemetryTransport {
    fn send(&mut self, snapshot: &TelemetrySnapshot) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall clock plus the blocking wait between cycles.
pub trait ClockPort {
    fn now(&self) -> DateTime<Utc>;

    fn sleep(&self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Platform port (hardware bring-up)
// ───────────────────────────────────────────────────────────────

/// Opens the physical peripherals. Each call is independent: a platform
/// may hand out sensors even when the step driver cannot be acquired.
pub trait Platform {
    fn step_driver(&mut self) -> Result<Box<dyn StepDriver>, InitError>;

    /// Uninitialized drivers for every configured sensor.
    fn sensors(&mut self) -> Result<Vec<Box<dyn SensorDriver>>, InitError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
