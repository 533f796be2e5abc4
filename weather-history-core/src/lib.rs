//! Core library for the `weather-history` CLI.
//!
//! This crate defines:
//! - Range selection and the date window it resolves to
//! - Geocoding and archive clients for Open-Meteo
//! - The pipeline turning a city name into an hourly temperature series
//! - Recent-search persistence and on-disk configuration
//!
//! It is used by `weather-history-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod range;
pub mod recent;

pub use config::{Config, Endpoints};
pub use error::WeatherError;
pub use model::{Coordinates, Location, RawReading, SeriesSummary, WeatherSample, WeatherSeries};
pub use pipeline::WeatherPipeline;
pub use provider::{Geocoder, HistoryArchive, OpenMeteoArchive, OpenMeteoGeocoder};
pub use range::{DateWindow, RangeCode, resolve_window, resolve_window_today};
pub use recent::{RecentSearchStore, RecentSearches};
