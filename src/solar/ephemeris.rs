//! Sunrise, solar noon and sunset for a calendar day.
//!
//! Backed by the SPA implementation in `solar-positioning`, evaluated at the
//! standard sunrise/sunset horizon (refraction plus solar radius).

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use log::trace;
use solar_positioning::{
    spa,
    time::DeltaT,
    types::{Horizon, SunriseResult},
};

use crate::error::PredictionError;

use super::Location;

/// UTC instants of the day's horizon crossings and transit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunEvents {
    pub sunrise: DateTime<Utc>,
    pub solar_noon: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Compute the sun events for the UTC day `date` at `location`.
///
/// Fails with [`PredictionError::NoHorizonCrossing`] during polar day or
/// polar night.
pub fn sun_events(date: NaiveDate, location: Location) -> Result<SunEvents, PredictionError> {
    let day = date.and_time(NaiveTime::MIN).and_utc();
    let delta_t = DeltaT::estimate_from_date(date.year(), date.month())
        .map_err(|_| PredictionError::OutOfRange)?;

    let result = spa::sunrise_sunset_for_horizon(
        day,
        location.latitude,
        location.longitude,
        delta_t,
        Horizon::SunriseSunset,
    )
    .map_err(|_| PredictionError::OutOfRange)?;

    match result {
        SunriseResult::RegularDay {
            sunrise,
            transit,
            sunset,
        } => Ok(SunEvents {
            sunrise,
            solar_noon: transit,
            sunset,
        }),
        SunriseResult::AllDay { .. } | SunriseResult::AllNight { .. } => {
            trace!("no horizon crossing on {date} at {location:?}");
            Err(PredictionError::NoHorizonCrossing)
        }
    }
}
