//! Unified error types for the heliostat station.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform. All variants are `Copy` so they
//! can be carried inside events and cycle reports without allocation.
//!
//! None of these are fatal: each category has a recovery path owned by the
//! component that produces it.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor or the actuator could not start.
    Init(InitError),
    /// A sensor read failed.
    Read(ReadError),
    /// The actuator faulted partway through a step sequence.
    Motion(MotionError),
    /// The sun-position computation failed.
    Prediction(PredictionError),
    /// Telemetry could not be delivered.
    Transport(TransportError),
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Read(e) => write!(f, "read: {e}"),
            Self::Motion(e) => write!(f, "motion: {e}"),
            Self::Prediction(e) => write!(f, "prediction: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Initialisation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// The I2C bus device could not be opened.
    BusUnavailable,
    /// A sensor did not acknowledge its configuration writes.
    DeviceNotResponding(&'static str),
    /// A GPIO line could not be requested as an output.
    GpioUnavailable(u32),
    /// A GPIO write failed while enabling the driver.
    GpioWriteFailed,
    /// Hardware support is not compiled into this build.
    Unsupported,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusUnavailable => write!(f, "I2C bus unavailable"),
            Self::DeviceNotResponding(name) => write!(f, "{name} not responding"),
            Self::GpioUnavailable(line) => write!(f, "GPIO line {line} unavailable"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::Unsupported => write!(f, "hardware support not built in"),
        }
    }
}

impl std::error::Error for InitError {}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Read errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// An I2C transaction with the named sensor failed.
    Bus(&'static str),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(name) => write!(f, "{name} bus transaction failed"),
        }
    }
}

impl std::error::Error for ReadError {}

impl From<ReadError> for Error {
    fn from(e: ReadError) -> Self {
        Self::Read(e)
    }
}

// ---------------------------------------------------------------------------
// Motion errors
// ---------------------------------------------------------------------------

/// Raised when the stepper cannot finish a sequence. The actuator keeps its
/// pre-call position so the next cycle retries from a known state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionError {
    /// The direction line could not be driven.
    DirectionWriteFailed,
    /// A step pulse failed after `issued` of `requested` pulses.
    PulseFailed { issued: u32, requested: u32 },
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectionWriteFailed => write!(f, "direction write failed"),
            Self::PulseFailed { issued, requested } => {
                write!(f, "step pulse failed after {issued}/{requested} pulses")
            }
        }
    }
}

impl std::error::Error for MotionError {}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Self::Motion(e)
    }
}

// ---------------------------------------------------------------------------
// Prediction errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionError {
    /// The sun never crosses the horizon on this day (polar day or night).
    NoHorizonCrossing,
    /// A computed or fixed wall-clock time does not exist in the time zone.
    NonexistentLocalTime,
    /// A computed instant falls outside the representable range.
    OutOfRange,
    /// Sunset does not come after sunrise even after correction.
    DegenerateDay,
}

impl fmt::Display for PredictionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHorizonCrossing => write!(f, "sun does not cross the horizon"),
            Self::NonexistentLocalTime => write!(f, "local time does not exist"),
            Self::OutOfRange => write!(f, "instant out of range"),
            Self::DegenerateDay => write!(f, "daylight interval is empty"),
        }
    }
}

impl std::error::Error for PredictionError {}

impl From<PredictionError> for Error {
    fn from(e: PredictionError) -> Self {
        Self::Prediction(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The snapshot could not be encoded as JSON.
    Encode,
    /// The endpoint could not be reached (connect, timeout, TLS).
    Connection,
    /// The endpoint answered with a non-success status.
    Status(u16),
    /// The HTTP client could not be constructed.
    ClientSetup,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode => write!(f, "snapshot encoding failed"),
            Self::Connection => write!(f, "endpoint unreachable"),
            Self::Status(code) => write!(f, "endpoint returned HTTP {code}"),
            Self::ClientSetup => write!(f, "HTTP client setup failed"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The named variable holds a value that cannot be parsed.
    Malformed(&'static str),
    /// The named field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(key) => write!(f, "{key} is malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
