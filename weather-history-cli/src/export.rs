use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::{fs::File, io::Write, path::Path};
use weather_history_core::WeatherSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// `.json` means JSON, anything else CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    day: &'a str,
    timestamp: &'a str,
    temperature_c: Option<f64>,
}

pub fn write_csv<W: Write>(series: &WeatherSeries, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    for sample in &series.samples {
        writer
            .serialize(ExportRow {
                day: sample.display_day(),
                timestamp: sample.iso_timestamp(),
                temperature_c: sample.temperature_c(),
            })
            .context("Failed to write CSV row")?;
    }

    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn write_json<W: Write>(series: &WeatherSeries, out: W) -> Result<()> {
    serde_json::to_writer_pretty(out, series).context("Failed to serialize series to JSON")
}

pub fn write_file(series: &WeatherSeries, path: &Path, format: ExportFormat) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;

    match format {
        ExportFormat::Csv => write_csv(series, file),
        ExportFormat::Json => write_json(series, file),
    }
}
