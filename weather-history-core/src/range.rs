//! Day-range selection and the date window it resolves to.
//!
//! The archive has no data for the current day, so every window ends
//! yesterday and reaches back a fixed number of days from there.

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

use crate::error::WeatherError;

/// Format used for dates sent to the archive service.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Supported "days back" selector values.
///
/// The discriminant is the selector value and also the offset between the
/// window's start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RangeCode {
    OneDay = 1,
    TwoDays = 2,
    ThreeDays = 3,
    #[default]
    SixDays = 6,
    TwelveDays = 12,
    FifteenDays = 15,
}

impl RangeCode {
    pub const fn all() -> &'static [RangeCode] {
        &[
            RangeCode::OneDay,
            RangeCode::TwoDays,
            RangeCode::ThreeDays,
            RangeCode::SixDays,
            RangeCode::TwelveDays,
            RangeCode::FifteenDays,
        ]
    }

    pub const fn value(self) -> u32 {
        self as u32
    }

    /// Days between the start and end of the window.
    pub const fn offset_days(self) -> u64 {
        self as u64
    }

    /// Calendar days covered by the window, both ends included.
    pub const fn days_covered(self) -> u64 {
        self.offset_days() + 1
    }

    pub fn label(self) -> String {
        format!("{} days", self.days_covered())
    }

    pub fn from_value(value: u32) -> Option<RangeCode> {
        RangeCode::all().iter().copied().find(|code| code.value() == value)
    }

    /// Like [`RangeCode::from_value`], but unknown values fall back to the default range.
    pub fn resolve(value: u32) -> RangeCode {
        RangeCode::from_value(value).unwrap_or_else(|| {
            let fallback = RangeCode::default();
            tracing::debug!(value, fallback = fallback.value(), "unsupported range code, using default");
            fallback
        })
    }

    pub fn window_ending_before(self, reference: NaiveDate) -> DateWindow {
        let end = reference
            .checked_sub_days(Days::new(1))
            .unwrap_or(NaiveDate::MIN);
        let start = end
            .checked_sub_days(Days::new(self.offset_days()))
            .unwrap_or(NaiveDate::MIN);

        DateWindow { start, end }
    }
}

impl std::fmt::Display for RangeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Inclusive calendar date window, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WeatherError> {
        if start > end {
            return Err(WeatherError::InvalidInput(format!(
                "Window start {start} is after its end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Start date as `yyyy-MM-dd`.
    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// End date as `yyyy-MM-dd`.
    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start_param(), self.end_param())
    }
}

/// Resolve a selector value against `reference`; unknown values use the default range.
pub fn resolve_window(value: u32, reference: NaiveDate) -> DateWindow {
    RangeCode::resolve(value).window_ending_before(reference)
}

/// [`resolve_window`] anchored on the local current date.
pub fn resolve_window_today(value: u32) -> DateWindow {
    resolve_window(value, Local::now().date_naive())
}
