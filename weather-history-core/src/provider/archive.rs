use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{Coordinates, RawReading},
    range::DateWindow,
};

use super::{HistoryArchive, endpoint, get_json, http_client};

pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com";

const SERVICE: &str = "archive";
const HOURLY_VARIABLE: &str = "temperature_2m";

/// Open-Meteo ERA5 reanalysis archive. One request per window, no paging.
#[derive(Debug, Clone)]
pub struct OpenMeteoArchive {
    http: Client,
    era5_url: String,
}

impl OpenMeteoArchive {
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, WeatherError> {
        Ok(Self {
            http: http_client(SERVICE, timeout_secs)?,
            era5_url: endpoint(base_url, "v1/era5"),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    hourly: ArchiveHourly,
}

#[derive(Debug, Deserialize)]
struct ArchiveHourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
}

fn zip_readings(hourly: ArchiveHourly) -> Result<Vec<RawReading>, WeatherError> {
    if hourly.time.len() != hourly.temperature_2m.len() {
        return Err(WeatherError::upstream(
            SERVICE,
            format!(
                "mismatched hourly arrays: {} timestamps, {} temperatures",
                hourly.time.len(),
                hourly.temperature_2m.len()
            ),
        ));
    }

    Ok(hourly
        .time
        .into_iter()
        .zip(hourly.temperature_2m)
        .map(|(timestamp, temperature_c)| RawReading {
            timestamp,
            temperature_c,
        })
        .collect())
}

#[async_trait]
impl HistoryArchive for OpenMeteoArchive {
    async fn fetch_hourly_series(
        &self,
        coords: Coordinates,
        window: &DateWindow,
    ) -> Result<Vec<RawReading>, WeatherError> {
        let query = [
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("start_date", window.start_param()),
            ("end_date", window.end_param()),
            ("hourly", HOURLY_VARIABLE.to_string()),
        ];

        let parsed: ArchiveResponse = get_json(&self.http, SERVICE, &self.era5_url, &query).await?;
        let readings = zip_readings(parsed.hourly)?;

        tracing::debug!(count = readings.len(), %window, "fetched hourly readings");
        Ok(readings)
    }
}
