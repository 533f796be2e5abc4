use thiserror::Error;

/// Message shown to the user for any lookup failure, whatever the cause.
pub const CITY_NOT_FOUND_MESSAGE: &str = "City not found. Try another name.";

/// Failures surfaced by the weather pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Rejected before any network call was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The geocoding service returned no candidate for the city.
    #[error("No geocoding match for city '{city}'")]
    NotFound { city: String },

    /// Network failure, timeout, bad status or malformed body from a remote service.
    #[error("{service} request failed: {reason}")]
    Upstream { service: &'static str, reason: String },
}

impl WeatherError {
    pub(crate) fn upstream(service: &'static str, reason: impl Into<String>) -> Self {
        WeatherError::Upstream {
            service,
            reason: reason.into(),
        }
    }

    /// Text meant for the end user.
    ///
    /// `NotFound` and `Upstream` collapse into the same message; use
    /// [`WeatherError::is_upstream`] to tell them apart.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::InvalidInput(msg) => msg.clone(),
            WeatherError::NotFound { .. } | WeatherError::Upstream { .. } => {
                CITY_NOT_FOUND_MESSAGE.to_string()
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::NotFound { .. })
    }

    /// True for transport or protocol failures that might succeed on a later attempt.
    pub fn is_upstream(&self) -> bool {
        matches!(self, WeatherError::Upstream { .. })
    }
}
