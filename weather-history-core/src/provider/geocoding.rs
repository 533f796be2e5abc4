use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{Coordinates, Location},
};

use super::{Geocoder, endpoint, get_json, http_client};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com";

const SERVICE: &str = "geocoding";

/// Open-Meteo geocoding search. Only the top candidate is requested;
/// same-named cities in other countries are never considered.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    search_url: String,
}

impl OpenMeteoGeocoder {
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, WeatherError> {
        Ok(Self {
            http: http_client(SERVICE, timeout_secs)?,
            search_url: endpoint(base_url, "v1/search"),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeoSearchResponse {
    #[serde(default)]
    results: Option<Vec<GeoCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeoCandidate {
    name: Option<String>,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn resolve_location(&self, city: &str) -> Result<Location, WeatherError> {
        let query = [
            ("name", city.to_string()),
            ("count", "1".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];

        let parsed: GeoSearchResponse = get_json(&self.http, SERVICE, &self.search_url, &query).await?;

        let candidate = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| WeatherError::NotFound {
                city: city.to_string(),
            })?;

        let location = Location {
            name: candidate.name.unwrap_or_else(|| city.to_string()),
            country: candidate.country,
            coordinates: Coordinates {
                latitude: candidate.latitude,
                longitude: candidate.longitude,
            },
        };

        tracing::info!(
            city,
            resolved = %location.display_name(),
            latitude = location.coordinates.latitude,
            longitude = location.coordinates.longitude,
            "resolved location"
        );

        Ok(location)
    }
}
