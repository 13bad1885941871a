//! Outbound application events.
//!
//! The [`Station`](super::service::Station) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them.

use crate::drivers::stepper::Motion;
use crate::error::Error;
use crate::solar::{NormalizedPosition, PredictorMode};

use super::service::SystemMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The station finished startup.
    Started {
        mode: SystemMode,
        predictor: PredictorMode,
        active_sensors: usize,
        configured_sensors: usize,
    },

    /// The panel was driven (or held) toward a new target.
    PanelMoved {
        target: NormalizedPosition,
        motion: Motion,
        position: u32,
    },

    /// A telemetry snapshot left the station.
    Telemetry(TelemetrySummary),

    /// A cycle stopped before the telemetry step.
    CycleAbandoned(Error),
}

/// Compact description of one delivered (or attempted) snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySummary {
    pub cycle: u64,
    pub timestamp: f64,
    pub available: usize,
    pub configured: usize,
    pub delivered: bool,
}
