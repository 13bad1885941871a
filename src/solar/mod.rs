//! Sun-position prediction.
//!
//! [`SunPredictor`] maps an instant to a [`NormalizedPosition`] along the
//! panel's east–west travel. The strategy is picked once at construction:
//! astronomical when the site coordinates are valid, a fixed 06:00–18:00
//! day otherwise. Callers never see a prediction failure; the panel is held
//! at the neutral midpoint instead.

pub mod daylight;
pub mod ephemeris;

use core::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use daylight::{AstronomicalDaylight, DaylightModel, DaylightWindow, FixedDaylight};

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Installation site in decimal degrees (longitude east-positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

// ---------------------------------------------------------------------------
// Normalized position
// ---------------------------------------------------------------------------

/// Fraction of the panel's east–west travel: 0.0 = east park, 1.0 = west park.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct NormalizedPosition(f64);

impl NormalizedPosition {
    pub const EAST: Self = Self(0.0);
    pub const NEUTRAL: Self = Self(0.5);
    pub const WEST: Self = Self(1.0);

    /// Clamp `value` into `[0, 1]`. NaN maps to [`Self::NEUTRAL`].
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::NEUTRAL;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Nearest absolute step for a travel of `total_steps`.
    pub fn to_steps(self, total_steps: u32) -> u32 {
        (self.0 * f64::from(total_steps)).round() as u32
    }
}

impl fmt::Display for NormalizedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0 * 100.0)
    }
}

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictorMode {
    Astronomical,
    DeterministicFallback,
}

impl fmt::Display for PredictorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Astronomical => write!(f, "astronomical"),
            Self::DeterministicFallback => write!(f, "fixed 06:00-18:00"),
        }
    }
}

pub struct SunPredictor {
    model: Box<dyn DaylightModel>,
    location: Location,
    tz: Tz,
}

impl SunPredictor {
    /// Astronomical predictor for valid coordinates, fixed-day fallback otherwise.
    pub fn new(location: Location, tz: Tz) -> Self {
        if !location.is_valid() {
            error!(
                "Invalid coordinates: lat={}, lon={}; falling back to fixed daylight",
                location.latitude, location.longitude
            );
            return Self::fixed(location, tz);
        }
        info!(
            "SunPredictor: astronomical (lat={}, lon={}, tz={})",
            location.latitude, location.longitude, tz
        );
        Self {
            model: Box::new(AstronomicalDaylight::new(location)),
            location,
            tz,
        }
    }

    /// Predictor pinned to the 06:00–18:00 fallback day.
    pub fn fixed(location: Location, tz: Tz) -> Self {
        info!("SunPredictor: fixed daylight (tz={})", tz);
        Self {
            model: Box::new(FixedDaylight::new()),
            location,
            tz,
        }
    }

    pub fn mode(&self) -> PredictorMode {
        self.model.mode()
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Daylight window for a local calendar day.
    pub fn daylight(&self, date: NaiveDate) -> Result<DaylightWindow, PredictionError> {
        self.model.daylight(date, self.tz)
    }

    /// Panel target for `at`, or the reason it could not be computed.
    pub fn try_position(&self, at: DateTime<Utc>) -> Result<NormalizedPosition, PredictionError> {
        let local = at.with_timezone(&self.tz);
        let window = self.daylight(local.date_naive())?;
        debug!(
            "Sun times {}: rise {} | noon {} | set {} ({:.1} h)",
            local.date_naive(),
            window.sunrise.format("%H:%M:%S %Z"),
            window.solar_noon.format("%H:%M:%S %Z"),
            window.sunset.format("%H:%M:%S %Z"),
            window.length().num_minutes() as f64 / 60.0,
        );

        if !window.contains(&local) {
            debug!("Outside daylight hours at {}: parking east", local.format("%H:%M:%S"));
            return Ok(NormalizedPosition::EAST);
        }
        window.fraction(&local)
    }

    /// Panel target for `at`. Never fails: prediction errors hold the panel
    /// at [`NormalizedPosition::NEUTRAL`].
    pub fn get_position(&self, at: DateTime<Utc>) -> NormalizedPosition {
        match self.try_position(at) {
            Ok(p) => p,
            Err(e) => {
                error!("Sun position failed ({}); holding neutral", e);
                NormalizedPosition::NEUTRAL
            }
        }
    }
}
