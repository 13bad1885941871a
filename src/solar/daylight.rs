//! Daylight models: the two strategies behind [`SunPredictor`](super::SunPredictor).
//!
//! | Model                  | Mode                   | Source of times          |
//! |------------------------|------------------------|--------------------------|
//! | `AstronomicalDaylight` | Astronomical           | SPA sunrise and sunset   |
//! | `FixedDaylight`        | DeterministicFallback  | 06:00 / 18:00 wall clock |

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::error::PredictionError;

use super::ephemeris;
use super::{Location, NormalizedPosition, PredictorMode};

/// Local-time span the panel sweeps across on a given day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaylightWindow {
    pub sunrise: DateTime<Tz>,
    pub solar_noon: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
    /// Whether the sunset instant itself still counts as daylight.
    pub sunset_inclusive: bool,
}

impl DaylightWindow {
    pub fn contains(&self, t: &DateTime<Tz>) -> bool {
        if *t < self.sunrise {
            return false;
        }
        *t < self.sunset || (self.sunset_inclusive && *t == self.sunset)
    }

    pub fn length(&self) -> TimeDelta {
        self.sunset - self.sunrise
    }

    /// Fraction of the window elapsed at `t`, clamped to `[0, 1]`.
    pub fn fraction(&self, t: &DateTime<Tz>) -> Result<NormalizedPosition, PredictionError> {
        let total = self.length().num_milliseconds();
        if total <= 0 {
            return Err(PredictionError::DegenerateDay);
        }
        let elapsed = (*t - self.sunrise).num_milliseconds();
        Ok(NormalizedPosition::new(elapsed as f64 / total as f64))
    }
}

/// Capability: derive the daylight window for a local calendar day.
pub trait DaylightModel {
    fn mode(&self) -> PredictorMode;

    fn daylight(&self, date: NaiveDate, tz: Tz) -> Result<DaylightWindow, PredictionError>;
}

// ── Astronomical ──────────────────────────────────────────────

pub struct AstronomicalDaylight {
    location: Location,
}

impl AstronomicalDaylight {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

impl DaylightModel for AstronomicalDaylight {
    fn mode(&self) -> PredictorMode {
        PredictorMode::Astronomical
    }

    fn daylight(&self, date: NaiveDate, tz: Tz) -> Result<DaylightWindow, PredictionError> {
        let events = ephemeris::sun_events(date, self.location)?;
        let sunrise = events.sunrise.with_timezone(&tz);
        let solar_noon = events.solar_noon.with_timezone(&tz);
        let mut sunset = events.sunset.with_timezone(&tz);

        // Date-boundary artifact: sunset landed on the previous day.
        if sunset < sunrise {
            sunset += TimeDelta::days(1);
        }
        if sunset <= sunrise {
            return Err(PredictionError::DegenerateDay);
        }

        Ok(DaylightWindow {
            sunrise,
            solar_noon,
            sunset,
            sunset_inclusive: true,
        })
    }
}

// ── Fixed wall-clock fallback ─────────────────────────────────

pub struct FixedDaylight {
    sunrise_hour: u32,
    sunset_hour: u32,
}

impl FixedDaylight {
    pub const SUNRISE_HOUR: u32 = 6;
    pub const SUNSET_HOUR: u32 = 18;

    pub fn new() -> Self {
        Self {
            sunrise_hour: Self::SUNRISE_HOUR,
            sunset_hour: Self::SUNSET_HOUR,
        }
    }

    fn local(date: NaiveDate, hour: u32, tz: Tz) -> Result<DateTime<Tz>, PredictionError> {
        let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or(PredictionError::NonexistentLocalTime)?;
        tz.from_local_datetime(&date.and_time(time))
            .earliest()
            .ok_or(PredictionError::NonexistentLocalTime)
    }
}

impl Default for FixedDaylight {
    fn default() -> Self {
        Self::new()
    }
}

impl DaylightModel for FixedDaylight {
    fn mode(&self) -> PredictorMode {
        PredictorMode::DeterministicFallback
    }

    fn daylight(&self, date: NaiveDate, tz: Tz) -> Result<DaylightWindow, PredictionError> {
        let sunrise = Self::local(date, self.sunrise_hour, tz)?;
        let sunset = Self::local(date, self.sunset_hour, tz)?;
        let solar_noon = sunrise + (sunset - sunrise) / 2;
        Ok(DaylightWindow {
            sunrise,
            solar_noon,
            sunset,
            sunset_inclusive: false,
        })
    }
}
