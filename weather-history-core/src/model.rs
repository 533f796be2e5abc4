use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// Human-readable day format, e.g. `15/04/2024`.
pub const DISPLAY_DAY_FORMAT: &str = "%d/%m/%Y";

const ISO_MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const ISO_SECOND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Best geocoding match for a city name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
}

impl Location {
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

/// One hourly reading exactly as returned by the archive.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub timestamp: String,
    pub temperature_c: Option<f64>,
}

/// Parse an archive timestamp (`yyyy-MM-ddTHH:mm`, seconds optional).
pub fn parse_timestamp(iso: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(iso, ISO_MINUTE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(iso, ISO_SECOND_FORMAT))
        .ok()
}

/// Derive the display day for an archive timestamp.
pub fn format_display_day(iso: &str) -> Option<String> {
    parse_timestamp(iso).map(|ts| ts.format(DISPLAY_DAY_FORMAT).to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSample {
    iso_timestamp: String,
    display_day: String,
    temperature_c: Option<f64>,
}

impl WeatherSample {
    /// Build a sample, deriving its display day from the timestamp.
    pub fn from_reading(reading: RawReading) -> Result<Self, WeatherError> {
        let display_day = format_display_day(&reading.timestamp).ok_or_else(|| {
            WeatherError::upstream(
                "archive",
                format!("unparseable timestamp '{}'", reading.timestamp),
            )
        })?;

        Ok(Self {
            iso_timestamp: reading.timestamp,
            display_day,
            temperature_c: reading.temperature_c,
        })
    }

    pub fn iso_timestamp(&self) -> &str {
        &self.iso_timestamp
    }

    pub fn display_day(&self) -> &str {
        &self.display_day
    }

    /// `None` when the archive has no value for this hour.
    pub fn temperature_c(&self) -> Option<f64> {
        self.temperature_c
    }

    /// Hour of day as `HH:mm`, if the timestamp carries one.
    pub fn time_of_day(&self) -> String {
        parse_timestamp(&self.iso_timestamp)
            .map(|ts| ts.format("%H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Chronological hourly temperatures for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSeries {
    pub city: String,
    pub samples: Vec<WeatherSample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl WeatherSeries {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Statistics over the readings that are present.
    pub fn summary(&self) -> SeriesSummary {
        let values: Vec<f64> = self.samples.iter().filter_map(|s| s.temperature_c).collect();

        let min = values.iter().copied().reduce(f64::min);
        let max = values.iter().copied().reduce(f64::max);
        let mean = if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        };

        SeriesSummary {
            count: self.samples.len(),
            missing: self.samples.len() - values.len(),
            min,
            max,
            mean,
        }
    }
}
