//! Station configuration parameters
//!
//! All tunable parameters for the heliostat station. Loaded once at startup
//! from environment variables (falling back to the defaults below) and then
//! passed by value into the constructors that need them.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::solar::Location;

/// Core station configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    // --- Telemetry ---
    /// HTTP endpoint receiving JSON snapshots
    pub endpoint_url: String,
    /// HTTP request timeout (seconds)
    pub http_timeout_secs: u64,
    /// Identifier reported in every snapshot
    pub device_id: String,

    // --- Timing ---
    /// Delay between successful control cycles (seconds)
    pub read_interval_secs: u64,
    /// Delay after an abandoned cycle before the next attempt (seconds)
    pub retry_delay_secs: u64,
    /// Stop after this many cycles; `None` runs until the process exits
    pub max_cycles: Option<u64>,

    // --- Site ---
    pub location: Location,
    /// IANA zone used to resolve the local calendar day
    pub timezone: Tz,

    // --- Hardware ---
    /// Skip hardware bring-up and run the synthetic fleet with a no-op stepper
    pub use_mock: bool,
    /// Linux I2C character device shared by all sensors
    pub i2c_bus: String,
    /// Linux GPIO character device carrying the stepper lines
    pub gpio_chip: String,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            // Telemetry
            endpoint_url: "https://httpbin.org/post".into(),
            http_timeout_secs: 10,
            device_id: "pi-0001".into(),

            // Timing
            read_interval_secs: 60, // 1/min
            retry_delay_secs: 5,
            max_cycles: None,

            // Site (Westminster)
            location: Location::new(51.5007, 0.1246),
            timezone: chrono_tz::Europe::London,

            // Hardware
            use_mock: false,
            i2c_bus: "/dev/i2c-1".into(),
            gpio_chip: "/dev/gpiochip0".into(),
        }
    }
}

impl StationConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Unset keys keep
    /// their default; set-but-unparseable keys are rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut c = Self::default();

        if let Some(v) = lookup("ENDPOINT_URL") {
            c.endpoint_url = v;
        }
        if let Some(v) = lookup("DEVICE_ID") {
            c.device_id = v;
        }
        if let Some(v) = lookup("I2C_BUS") {
            c.i2c_bus = v;
        }
        if let Some(v) = lookup("GPIO_CHIP") {
            c.gpio_chip = v;
        }
        if let Some(v) = parsed(&lookup, "HTTP_TIMEOUT")? {
            c.http_timeout_secs = v;
        }
        if let Some(v) = parsed(&lookup, "READ_INTERVAL")? {
            c.read_interval_secs = v;
        }
        if let Some(v) = parsed(&lookup, "RETRY_DELAY")? {
            c.retry_delay_secs = v;
        }
        if let Some(v) = parsed(&lookup, "CYCLE_LIMIT")? {
            c.max_cycles = Some(v);
        }
        if let Some(v) = parsed(&lookup, "LATITUDE")? {
            c.location.latitude = v;
        }
        if let Some(v) = parsed(&lookup, "LONGITUDE")? {
            c.location.longitude = v;
        }
        if let Some(v) = parsed(&lookup, "TIMEZONE")? {
            c.timezone = v;
        }
        if let Some(v) = lookup("USE_MOCK") {
            c.use_mock = parse_flag(&v).ok_or(ConfigError::Malformed("USE_MOCK"))?;
        }

        c.validate()?;
        Ok(c)
    }

    /// Reject values the control loop cannot run with. Coordinates are not
    /// checked here; invalid ones select the fixed-daylight predictor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.read_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("read interval must be > 0"));
        }
        if self.endpoint_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("endpoint URL is empty"));
        }
        if self.device_id.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("device id is empty"));
        }
        Ok(())
    }
}

fn parsed<T: core::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Malformed(key)),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
