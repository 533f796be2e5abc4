use weather_history_core::{DateWindow, RangeCode, WeatherSeries};

const NO_VALUE: &str = "--";

fn fmt_temp(value: Option<f64>) -> String {
    value.map_or_else(|| NO_VALUE.to_string(), |v| format!("{v:.1}"))
}

/// Per-day min/max/mean rows in the order days first appear.
fn daily_rows(series: &WeatherSeries) -> Vec<(String, Option<f64>, Option<f64>, Option<f64>)> {
    let mut days: Vec<(String, Vec<f64>)> = Vec::new();

    for sample in &series.samples {
        let day = sample.display_day();
        if days.last().map(|(d, _)| d.as_str()) != Some(day) {
            days.push((day.to_string(), Vec::new()));
        }
        if let (Some(temp), Some((_, values))) = (sample.temperature_c(), days.last_mut()) {
            values.push(temp);
        }
    }

    days.into_iter()
        .map(|(day, values)| {
            let min = values.iter().copied().reduce(f64::min);
            let max = values.iter().copied().reduce(f64::max);
            let mean = (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64);
            (day, min, max, mean)
        })
        .collect()
}

fn day_line(day: &str, min: &str, max: &str, mean: &str) -> String {
    format!("{day:<12} {min:>8} {max:>8} {mean:>8}")
}

pub fn series_report(series: &WeatherSeries, window: &DateWindow, code: RangeCode) -> String {
    let summary = series.summary();

    let mut lines = vec![
        format!("Temperature in {} ({}, {})", series.city, window, code.label()),
        String::new(),
        day_line("Day", "Min °C", "Max °C", "Mean °C"),
    ];

    lines.extend(daily_rows(series).into_iter().map(|(day, min, max, mean)| {
        day_line(&day, &fmt_temp(min), &fmt_temp(max), &fmt_temp(mean))
    }));

    let mut totals = format!(
        "{} hourly readings in {}: min {} °C, max {} °C, mean {} °C",
        summary.count,
        series.city,
        fmt_temp(summary.min),
        fmt_temp(summary.max),
        fmt_temp(summary.mean)
    );
    if summary.missing > 0 {
        totals.push_str(&format!(" ({} missing)", summary.missing));
    }
    lines.push(String::new());
    lines.push(totals);

    lines.join("\n") + "\n"
}

pub fn range_table(default: RangeCode) -> String {
    let mut out = format!("{:>6}  {:<8}\n", "Code", "Covers");
    for code in RangeCode::all() {
        let marker = if *code == default { "  (default)" } else { "" };
        out.push_str(&format!("{:>6}  {:<8}{marker}\n", code.value(), code.label()));
    }
    out
}
