use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use weather_history_core::{
    Config, DateWindow, RangeCode, RecentSearchStore, WeatherPipeline, WeatherSeries,
    resolve_window_today,
};

use crate::{
    export::{self, ExportFormat},
    prompt, render,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-history", version, about = "Historical hourly temperatures for a city")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up hourly temperatures for a city.
    Search {
        /// City name; prompts with recent searches if absent.
        city: Option<String>,

        /// Days-back selector, see `weather-history ranges`. Unknown values use the 7-day range.
        #[arg(short, long)]
        range: Option<u32>,

        /// Write the series to this file.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Export format; inferred from the file extension when omitted.
        #[arg(long, value_enum, requires = "export")]
        format: Option<ExportFormat>,
    },

    /// List recently searched cities.
    Recent {
        /// Forget all recent searches.
        #[arg(long)]
        clear: bool,
    },

    /// Show the supported day ranges.
    Ranges,

    /// Interactively edit default range and request timeout.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Search {
                city,
                range,
                export,
                format,
            } => search(city, range, export, format).await,
            Command::Recent { clear } => recent(clear),
            Command::Ranges => {
                let config = Config::load()?;
                print!("{}", render::range_table(config.default_range()));
                Ok(())
            }
            Command::Configure => {
                let mut config = Config::load()?;
                prompt::configure(&mut config)?;
                config.save()?;
                println!(
                    "Saved configuration to {}",
                    Config::config_file_path()?.display()
                );
                Ok(())
            }
        }
    }
}

async fn search(
    city: Option<String>,
    range: Option<u32>,
    export_path: Option<PathBuf>,
    format: Option<ExportFormat>,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = RecentSearchStore::open_default()?;
    let recent = store.load().unwrap_or_else(|err| {
        tracing::warn!("Ignoring unreadable recent searches: {err:#}");
        Default::default()
    });

    let city = match city {
        Some(city) => city,
        None => prompt::choose_city(&recent)?,
    };

    let code = range.map_or_else(|| config.default_range(), RangeCode::resolve);
    let window = resolve_window_today(code.value());

    let pipeline = WeatherPipeline::from_config(&config)
        .map_err(|err| anyhow!(err).context("Failed to set up HTTP clients"))?;

    let series = run_search(&pipeline, &store, &city, &window).await?;

    print!("{}", render::series_report(&series, &window, code));

    if let Some(path) = export_path {
        let format = format.unwrap_or_else(|| ExportFormat::from_path(&path));
        export::write_file(&series, &path, format)
            .with_context(|| format!("Failed to export to {}", path.display()))?;
        println!("Exported {} rows to {}", series.len(), path.display());
    }

    Ok(())
}

/// Look up `city` and remember it only if the lookup succeeds.
async fn run_search(
    pipeline: &WeatherPipeline,
    store: &RecentSearchStore,
    city: &str,
    window: &DateWindow,
) -> anyhow::Result<WeatherSeries> {
    let series = match pipeline.get_weather_series(city, window).await {
        Ok(series) => series,
        Err(err) => {
            tracing::debug!(error = %err, "weather lookup failed");
            return Err(anyhow!(err.user_message()));
        }
    };

    if let Err(err) = store.record(&series.city) {
        tracing::warn!("Failed to update recent searches: {err:#}");
    }

    Ok(series)
}

fn recent(clear: bool) -> anyhow::Result<()> {
    let store = RecentSearchStore::open_default()?;

    if clear {
        let mut recent = store.load().unwrap_or_default();
        recent.clear();
        store.save(&recent)?;
        println!("Cleared recent searches.");
        return Ok(());
    }

    let recent = store.load()?;
    if recent.is_empty() {
        println!("No recent searches.");
    }
    for (i, city) in recent.entries().iter().enumerate() {
        println!("{}. {city}", i + 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use clap::CommandFactory;
    use weather_history_core::{
        Coordinates, Geocoder, HistoryArchive, Location, RawReading, WeatherError,
        error::CITY_NOT_FOUND_MESSAGE, resolve_window,
    };

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_search_with_range_and_export() {
        let cli = Cli::try_parse_from([
            "weather-history",
            "search",
            "Madrid",
            "--range",
            "12",
            "--export",
            "out.csv",
        ])
        .expect("valid args");

        match cli.command {
            Command::Search {
                city,
                range,
                export,
                format,
            } => {
                assert_eq!(city.as_deref(), Some("Madrid"));
                assert_eq!(range, Some(12));
                assert_eq!(export, Some(PathBuf::from("out.csv")));
                assert_eq!(format, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[derive(Debug)]
    struct FixedGeocoder(Option<Location>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn resolve_location(&self, city: &str) -> Result<Location, WeatherError> {
            self.0.clone().ok_or_else(|| WeatherError::NotFound {
                city: city.to_string(),
            })
        }
    }

    #[derive(Debug)]
    struct FixedArchive;

    #[async_trait]
    impl HistoryArchive for FixedArchive {
        async fn fetch_hourly_series(
            &self,
            _coordinates: Coordinates,
            _window: &DateWindow,
        ) -> Result<Vec<RawReading>, WeatherError> {
            Ok(vec![RawReading {
                timestamp: "2024-04-14T00:00".into(),
                temperature_c: Some(12.0),
            }])
        }
    }

    fn pipeline(location: Option<Location>) -> WeatherPipeline {
        WeatherPipeline::new(Box::new(FixedGeocoder(location)), Box::new(FixedArchive))
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

    fn window() -> DateWindow {
        resolve_window(6, NaiveDate::from_ymd_opt(2024, 4, 15).unwrap())
    }

    #[tokio::test]
    async fn failed_search_leaves_recent_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RecentSearchStore::new(dir.path().join("recent.json"));
        store.record("Lima").expect("seed");
        let before = std::fs::read_to_string(store.path()).expect("read");

        let err = run_search(&pipeline(None), &store, "Nonexistent City XYZ", &window())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), CITY_NOT_FOUND_MESSAGE);
        let after = std::fs::read_to_string(store.path()).expect("read");
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn failed_first_search_creates_no_recent_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RecentSearchStore::new(dir.path().join("recent.json"));

        assert!(run_search(&pipeline(None), &store, "Atlantis", &window()).await.is_err());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn successful_search_records_trimmed_city() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RecentSearchStore::new(dir.path().join("recent.json"));
        store.record("Lima").expect("seed");

        let series = run_search(&pipeline(Some(madrid())), &store, "  Madrid ", &window())
            .await
            .expect("search succeeds");

        assert_eq!(series.city, "Madrid");
        assert_eq!(series.len(), 1);
        assert_eq!(store.load().expect("load").entries(), ["Madrid", "Lima"]);
    }

    #[test]
    fn format_requires_export_path() {
        let res = Cli::try_parse_from(["weather-history", "search", "Madrid", "--format", "json"]);
        assert!(res.is_err());
    }
}
