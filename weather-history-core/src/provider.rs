use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::{fmt::Debug, time::Duration};

use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, Location, RawReading},
    range::DateWindow,
};

pub mod archive;
pub mod geocoding;

pub use archive::OpenMeteoArchive;
pub use geocoding::OpenMeteoGeocoder;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const USER_AGENT: &str = concat!("weather-history/", env!("CARGO_PKG_VERSION"));

/// Resolves free-text city names to a single best location.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve_location(&self, city: &str) -> Result<Location, WeatherError>;
}

/// Source of past hourly temperatures.
#[async_trait]
pub trait HistoryArchive: Send + Sync + Debug {
    async fn fetch_hourly_series(
        &self,
        coordinates: Coordinates,
        window: &DateWindow,
    ) -> Result<Vec<RawReading>, WeatherError>;
}

/// Construct both Open-Meteo clients from config.
pub fn providers_from_config(
    config: &Config,
) -> Result<(OpenMeteoGeocoder, OpenMeteoArchive), WeatherError> {
    let timeout = config.timeout_secs();
    let geocoder = OpenMeteoGeocoder::with_base_url(config.geocoding_url(), timeout)?;
    let archive = OpenMeteoArchive::with_base_url(config.archive_url(), timeout)?;
    Ok((geocoder, archive))
}

pub(crate) fn http_client(service: &'static str, timeout_secs: u64) -> Result<Client, WeatherError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| WeatherError::upstream(service, format!("failed to build HTTP client: {e}")))
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Issue a GET and decode the JSON body, mapping every failure to `Upstream`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    service: &'static str,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, WeatherError> {
    tracing::debug!(service, url, ?query, "sending request");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| WeatherError::upstream(service, format!("failed to send request: {e}")))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| WeatherError::upstream(service, format!("failed to read response body: {e}")))?;

    if !status.is_success() {
        return Err(WeatherError::upstream(
            service,
            format!("status {}: {}", status, truncate_body(&body)),
        ));
    }

    serde_json::from_str(&body)
        .map_err(|e| WeatherError::upstream(service, format!("failed to parse JSON: {e}")))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
