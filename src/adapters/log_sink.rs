//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events as
//! one-line records through the `log` facade.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::drivers::stepper::Motion;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                mode,
                predictor,
                active_sensors,
                configured_sensors,
            } => {
                info!(
                    "START | mode={} | predictor={} | sensors={}/{}",
                    mode, predictor, active_sensors, configured_sensors
                );
            }
            AppEvent::PanelMoved {
                target,
                motion,
                position,
            } => match motion {
                Motion::Holding => info!("MOTION | target={} | hold at step {}", target, position),
                Motion::Stepped { direction, steps } => info!(
                    "MOTION | target={} | {:?} {} steps | now at step {}",
                    target, direction, steps, position
                ),
            },
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | cycle={} | ts={:.3} | sensors={}/{} | delivered={}",
                    t.cycle,
                    t.timestamp,
                    t.available,
                    t.configured,
                    if t.delivered { "yes" } else { "NO" },
                );
            }
            AppEvent::CycleAbandoned(e) => {
                warn!("CYCLE | abandoned: {}", e);
            }
        }
    }
}
