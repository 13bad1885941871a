//! Panel stepper motor (28BYJ-48 class, geared) and its actuator.
//!
//! [`PanelActuator`] owns the absolute step position and turns a normalized
//! target into a relative step count. The pulses themselves go through a
//! [`StepDriver`]: [`GpioStepDriver`] on real pins, [`NullStepDriver`] when
//! there is no motor.
//!
//! ## Motion contract
//!
//! A move is all-or-nothing for position bookkeeping. The stored position
//! only changes after every pulse of the sequence succeeded; a fault leaves
//! it at the pre-call value and the next cycle recomputes the delta from
//! there.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{debug, info, warn};

use crate::app::ports::StepDriver;
use crate::error::{InitError, MotionError};
use crate::solar::NormalizedPosition;

/// Full steps per motor shaft revolution.
pub const STEPS_PER_REV: u32 = 32;
/// Output gearbox reduction between the motor and the panel axis.
pub const GEAR_RATIO: f64 = 16.128;
/// Steps across the full east–west travel: `round(32 × 16.128)`.
pub const TOTAL_STEPS: u32 = 516;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward position 0.0.
    East,
    /// Toward position 1.0.
    West,
}

/// What a single `move_to` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Already at the target; no pulses.
    Holding,
    Stepped { direction: Direction, steps: u32 },
}

/// Step pulse shape in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseTiming {
    pub high_us: u32,
    pub low_us: u32,
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self {
            high_us: 1_000,
            low_us: 1_000,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Actuator
// ───────────────────────────────────────────────────────────────

pub struct PanelActuator<D> {
    driver: D,
    position: u32,
}

impl<D: StepDriver> PanelActuator<D> {
    /// Start at step 0 (east park).
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            position: 0,
        }
    }

    /// Current absolute step, in `[0, TOTAL_STEPS]`.
    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Drive to `target`. Repeating the same target issues no pulses.
    pub fn move_to(&mut self, target: NormalizedPosition) -> Result<Motion, MotionError> {
        let target_steps = target.to_steps(TOTAL_STEPS);
        let delta = i64::from(target_steps) - i64::from(self.position);
        if delta == 0 {
            debug!("Panel holding at step {}", self.position);
            return Ok(Motion::Holding);
        }

        let direction = if delta > 0 {
            Direction::West
        } else {
            Direction::East
        };
        let steps = delta.unsigned_abs() as u32;

        self.driver.set_direction(direction).inspect_err(|e| {
            warn!("Panel move aborted before stepping: {}", e);
        })?;

        for issued in 0..steps {
            if let Err(e) = self.driver.pulse() {
                warn!("Panel move aborted: {} (position stays {})", e, self.position);
                return Err(MotionError::PulseFailed {
                    issued,
                    requested: steps,
                });
            }
        }

        info!(
            "Panel moved {:?} {} steps: {} -> {} ({})",
            direction, steps, self.position, target_steps, target
        );
        self.position = target_steps;
        Ok(Motion::Stepped { direction, steps })
    }
}

// ───────────────────────────────────────────────────────────────
// GPIO driver (DIR / STEP / active-low ENABLE)
// ───────────────────────────────────────────────────────────────

/// Step/direction driver on three output pins. The driver stage is enabled
/// for as long as this value lives and disabled on drop.
pub struct GpioStepDriver<P: OutputPin, D: DelayNs> {
    dir: P,
    step: P,
    enable: P,
    delay: D,
    timing: PulseTiming,
}

impl<P: OutputPin, D: DelayNs> GpioStepDriver<P, D> {
    /// Pull the enable line low and park STEP low.
    pub fn new(dir: P, step: P, enable: P, delay: D, timing: PulseTiming) -> Result<Self, InitError> {
        let mut driver = Self {
            dir,
            step,
            enable,
            delay,
            timing,
        };
        driver.step.set_low().map_err(|_| InitError::GpioWriteFailed)?;
        driver.enable.set_low().map_err(|_| InitError::GpioWriteFailed)?;
        info!("Stepper driver enabled");
        Ok(driver)
    }
}

impl<P: OutputPin, D: DelayNs> StepDriver for GpioStepDriver<P, D> {
    fn set_direction(&mut self, direction: Direction) -> Result<(), MotionError> {
        let result = match direction {
            Direction::West => self.dir.set_high(),
            Direction::East => self.dir.set_low(),
        };
        result.map_err(|_| MotionError::DirectionWriteFailed)
    }

    fn pulse(&mut self) -> Result<(), MotionError> {
        let failed = MotionError::PulseFailed {
            issued: 0,
            requested: 1,
        };
        self.step.set_high().map_err(|_| failed)?;
        self.delay.delay_us(self.timing.high_us);
        self.step.set_low().map_err(|_| failed)?;
        self.delay.delay_us(self.timing.low_us);
        Ok(())
    }
}

impl<P: OutputPin, D: DelayNs> Drop for GpioStepDriver<P, D> {
    fn drop(&mut self) {
        let _ = self.step.set_low();
        if self.enable.set_high().is_err() {
            warn!("Stepper enable line could not be released");
        } else {
            info!("Stepper driver released");
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Null driver (full mock mode)
// ───────────────────────────────────────────────────────────────

/// Accepts every command and counts pulses.
#[derive(Debug, Default)]
pub struct NullStepDriver {
    pulses: u64,
    direction: Option<Direction>,
}

impl NullStepDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pulses(&self) -> u64 {
        self.pulses
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }
}

impl StepDriver for NullStepDriver {
    fn set_direction(&mut self, direction: Direction) -> Result<(), MotionError> {
        self.direction = Some(direction);
        Ok(())
    }

    fn pulse(&mut self) -> Result<(), MotionError> {
        self.pulses += 1;
        Ok(())
    }
}
