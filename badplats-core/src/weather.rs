//! Weather acquisition for a place: one provider call, shaped into the
//! current-conditions record and the hourly strip.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset, Local, TimeZone, Timelike, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    model::{CurrentConditions, HourlyEntry, WeatherReport},
    provider::{RawCurrently, RawForecast, RawHourPoint, WeatherProvider},
};

pub const TEMPERATURE_SUFFIX: &str = "°C";

pub const FETCH_FAILED_MESSAGE: &str = "Ett fel uppstod när vädret för badplatsen skulle hämtas.";

/// The only failure the screen ever shows for weather. The provider error
/// is kept as the source for logs.
#[derive(Debug, Error)]
#[error("{}", FETCH_FAILED_MESSAGE)]
pub struct WeatherFetchError {
    #[source]
    cause: anyhow::Error,
}

impl WeatherFetchError {
    pub fn new(cause: anyhow::Error) -> Self {
        Self { cause }
    }

    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }
}

/// Time zone used to read the hour of day from forecast timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HourZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

pub fn current_conditions(raw: &RawCurrently) -> Result<CurrentConditions> {
    let degrees = whole_degrees(raw.temperature)?;

    Ok(CurrentConditions {
        temperature: format!("{degrees}{TEMPERATURE_SUFFIX}"),
        summary: raw.summary.clone(),
        icon: raw.icon.clone(),
    })
}

/// One entry per point, in provider order.
pub fn hourly_entries<Tz: TimeZone>(points: &[RawHourPoint], tz: &Tz) -> Result<Vec<HourlyEntry>> {
    points
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            hourly_entry(point, tz).with_context(|| format!("Invalid hourly point #{idx}"))
        })
        .collect()
}

fn hourly_entry<Tz: TimeZone>(point: &RawHourPoint, tz: &Tz) -> Result<HourlyEntry> {
    Ok(HourlyEntry {
        hour: hour_of_day(point.time, tz)?,
        temperature: whole_degrees(point.temperature)?,
        icon: point.icon.clone(),
    })
}

/// Hour of day in `tz` for a timestamp in seconds since the epoch.
pub fn hour_of_day<Tz: TimeZone>(seconds: i64, tz: &Tz) -> Result<u32> {
    let millis = seconds
        .checked_mul(1000)
        .ok_or_else(|| anyhow!("Timestamp {seconds} is out of range"))?;

    let utc = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| anyhow!("Timestamp {seconds} is out of range"))?;

    Ok(utc.with_timezone(tz).hour())
}

/// Truncates toward zero.
fn whole_degrees(temperature: f64) -> Result<i64> {
    if !temperature.is_finite() {
        return Err(anyhow!("Temperature {temperature} is not a finite number"));
    }
    Ok(temperature.trunc() as i64)
}

pub fn shape_report(raw: &RawForecast, zone: HourZone) -> Result<WeatherReport> {
    let current = current_conditions(&raw.currently).context("Invalid current conditions")?;
    let hourly = match zone {
        HourZone::Local => hourly_entries(&raw.hourly.data, &Local)?,
        HourZone::Fixed(offset) => hourly_entries(&raw.hourly.data, &offset)?,
    };

    Ok(WeatherReport { current, hourly })
}

#[derive(Debug)]
pub struct WeatherAcquirer {
    provider: Box<dyn WeatherProvider>,
    zone: HourZone,
}

impl WeatherAcquirer {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider, zone: HourZone::Local }
    }

    pub fn with_zone(mut self, zone: HourZone) -> Self {
        self.zone = zone;
        self
    }

    /// Fetches and shapes weather for the coordinates. Any failure is
    /// collapsed into [`WeatherFetchError`]; nothing partial is returned.
    pub async fn fetch(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<WeatherReport, WeatherFetchError> {
        match self.try_fetch(latitude, longitude).await {
            Ok(report) => {
                debug!(hours = report.hourly.len(), "weather shaped");
                Ok(report)
            }
            Err(cause) => {
                warn!(latitude, longitude, "weather fetch failed: {cause:#}");
                Err(WeatherFetchError::new(cause))
            }
        }
    }

    async fn try_fetch(&self, latitude: &str, longitude: &str) -> Result<WeatherReport> {
        let raw = self.provider.fetch_weather(latitude, longitude).await?;
        shape_report(&raw, self.zone)
    }
}
