//! City name + date window to a complete [`WeatherSeries`].
//!
//! Geocoding and the archive lookup run strictly in sequence. Any failure
//! aborts the call; no partially built series is ever returned. The pipeline
//! keeps no state between calls, so discarding results of a superseded search
//! is up to the caller.

use crate::{
    Config,
    error::WeatherError,
    model::{WeatherSample, WeatherSeries},
    provider::{Geocoder, HistoryArchive, providers_from_config},
    range::DateWindow,
};

#[derive(Debug)]
pub struct WeatherPipeline {
    geocoder: Box<dyn Geocoder>,
    archive: Box<dyn HistoryArchive>,
}

impl WeatherPipeline {
    pub fn new(geocoder: Box<dyn Geocoder>, archive: Box<dyn HistoryArchive>) -> Self {
        Self { geocoder, archive }
    }

    /// Pipeline backed by the Open-Meteo services named in `config`.
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let (geocoder, archive) = providers_from_config(config)?;
        Ok(Self::new(Box::new(geocoder), Box::new(archive)))
    }

    pub async fn get_weather_series(
        &self,
        city: &str,
        window: &DateWindow,
    ) -> Result<WeatherSeries, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::InvalidInput(
                "City name must not be empty".to_string(),
            ));
        }

        let location = self.geocoder.resolve_location(city).await?;
        let readings = self
            .archive
            .fetch_hourly_series(location.coordinates, window)
            .await?;

        let samples = readings
            .into_iter()
            .map(WeatherSample::from_reading)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(city, samples = samples.len(), %window, "built weather series");

        Ok(WeatherSeries {
            city: city.to_string(),
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, Location, RawReading};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug, Default)]
    struct CallLog {
        geocode: AtomicUsize,
        archive: AtomicUsize,
    }

    #[derive(Debug)]
    struct FakeGeocoder {
        location: Option<Location>,
        calls: Arc<CallLog>,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn resolve_location(&self, city: &str) -> Result<Location, WeatherError> {
            self.calls.geocode.fetch_add(1, Ordering::SeqCst);
            self.location.clone().ok_or_else(|| WeatherError::NotFound {
                city: city.to_string(),
            })
        }
    }

    #[derive(Debug)]
    struct FakeArchive {
        readings: Result<Vec<RawReading>, &'static str>,
        calls: Arc<CallLog>,
    }

    #[async_trait]
    impl HistoryArchive for FakeArchive {
        async fn fetch_hourly_series(
            &self,
            _coordinates: Coordinates,
            _window: &DateWindow,
        ) -> Result<Vec<RawReading>, WeatherError> {
            self.calls.archive.fetch_add(1, Ordering::SeqCst);
            self.readings
                .clone()
                .map_err(|reason| WeatherError::upstream("archive", reason))
        }
    }

    fn madrid() -> Location {
        Location {
            name: "Madrid".into(),
            country: Some("Spain".into()),
            coordinates: Coordinates {
                latitude: 40.4,
                longitude: -3.7,
            },
        }
    }

    fn hourly(count: u32) -> Vec<RawReading> {
        (0..count)
            .map(|h| RawReading {
                timestamp: format!("2024-04-14T{h:02}:00"),
                temperature_c: Some(10.0 + f64::from(h)),
            })
            .collect()
    }

    fn window() -> DateWindow {
        let end = NaiveDate::from_ymd_opt(2024, 4, 14).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 4, 8).unwrap();
        DateWindow::new(start, end).unwrap()
    }

    fn pipeline(
        location: Option<Location>,
        readings: Result<Vec<RawReading>, &'static str>,
    ) -> (WeatherPipeline, Arc<CallLog>) {
        let calls = Arc::new(CallLog::default());
        let pipeline = WeatherPipeline::new(
            Box::new(FakeGeocoder {
                location,
                calls: Arc::clone(&calls),
            }),
            Box::new(FakeArchive {
                readings,
                calls: Arc::clone(&calls),
            }),
        );
        (pipeline, calls)
    }

    #[tokio::test]
    async fn blank_city_is_rejected_without_network_calls() {
        let (pipeline, calls) = pipeline(Some(madrid()), Ok(hourly(3)));

        for city in ["", "   ", "\t\n"] {
            let err = pipeline.get_weather_series(city, &window()).await.unwrap_err();
            assert!(matches!(err, WeatherError::InvalidInput(_)));
        }

        assert_eq!(calls.geocode.load(Ordering::SeqCst), 0);
        assert_eq!(calls.archive.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_city_stops_before_archive() {
        let (pipeline, calls) = pipeline(None, Ok(hourly(3)));

        let err = pipeline
            .get_weather_series("Nonexistent City XYZ", &window())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(calls.archive.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn builds_series_in_upstream_order() {
        let (pipeline, calls) = pipeline(Some(madrid()), Ok(hourly(7)));

        let series = pipeline.get_weather_series("Madrid", &window()).await.unwrap();

        assert_eq!(series.city, "Madrid");
        assert_eq!(series.samples.len(), 7);
        let stamps: Vec<&str> = series.samples.iter().map(|s| s.iso_timestamp()).collect();
        let expected: Vec<String> = hourly(7).into_iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, expected);
        assert_eq!(calls.geocode.load(Ordering::SeqCst), 1);
        assert_eq!(calls.archive.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn every_sample_carries_its_derived_day() {
        let (pipeline, _) = pipeline(Some(madrid()), Ok(hourly(24)));
        let series = pipeline.get_weather_series(" Madrid ", &window()).await.unwrap();

        assert_eq!(series.city, "Madrid");
        for sample in &series.samples {
            assert_eq!(
                Some(sample.display_day().to_string()),
                crate::model::format_display_day(sample.iso_timestamp())
            );
        }
    }

    #[tokio::test]
    async fn archive_failure_yields_no_series() {
        let (pipeline, _) = pipeline(Some(madrid()), Err("connection reset"));

        let err = pipeline.get_weather_series("Madrid", &window()).await.unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(err.user_message(), crate::error::CITY_NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn one_bad_timestamp_fails_the_whole_call() {
        let mut readings = hourly(3);
        readings[1].timestamp = "garbage".into();
        let (pipeline, _) = pipeline(Some(madrid()), Ok(readings));

        let err = pipeline.get_weather_series("Madrid", &window()).await.unwrap_err();
        assert!(err.is_upstream());
    }
}
