use anyhow::{Context, Result};
use inquire::{CustomType, Select, Text};
use std::fmt;
use weather_history_core::{Config, RangeCode, RecentSearches};

#[derive(Debug, Clone, PartialEq, Eq)]
enum CityChoice {
    Recent(String),
    Other,
}

impl fmt::Display for CityChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CityChoice::Recent(city) => f.write_str(city),
            CityChoice::Other => f.write_str("Another city..."),
        }
    }
}

fn city_choices(recent: &RecentSearches) -> Vec<CityChoice> {
    recent
        .entries()
        .iter()
        .cloned()
        .map(CityChoice::Recent)
        .chain(std::iter::once(CityChoice::Other))
        .collect()
}

/// Ask for a city, offering recent searches first when there are any.
pub fn choose_city(recent: &RecentSearches) -> Result<String> {
    if !recent.is_empty() {
        let choice = Select::new("City:", city_choices(recent))
            .prompt()
            .context("City selection cancelled")?;

        if let CityChoice::Recent(city) = choice {
            return Ok(city);
        }
    }

    Text::new("City name:")
        .with_placeholder("e.g. Madrid, Tokyo")
        .prompt()
        .context("City input cancelled")
}

pub fn configure(config: &mut Config) -> Result<()> {
    let ranges = RangeCode::all().to_vec();
    let current = config.default_range();
    let cursor = ranges.iter().position(|c| *c == current).unwrap_or(0);

    let range = Select::new("Default range:", ranges)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Range selection cancelled")?;
    config.set_default_range(range);

    let timeout = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.timeout_secs())
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Timeout input cancelled")?;
    config.timeout_secs = Some(timeout);

    Ok(())
}
