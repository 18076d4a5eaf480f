use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, time::Duration};

use crate::model::RawForecastDocument;

pub mod openweather;

pub use openweather::OpenWeatherClient;
pub use reqwest::StatusCode;

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/forecast";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Unit system requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Imperial,
    Metric,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
            Units::Standard => "standard",
        }
    }

    /// Temperature symbol used in table headers.
    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Imperial => "F",
            Units::Metric => "C",
            Units::Standard => "K",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Imperial, Units::Metric, Units::Standard]
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "imperial" => Ok(Units::Imperial),
            "metric" => Ok(Units::Metric),
            "standard" => Ok(Units::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: imperial, metric, standard."
            )),
        }
    }
}

/// Everything the forecast client needs; built from [`crate::Config`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub units: Units,
    pub endpoint: String,
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            units: Units::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Failures surfaced by a [`ForecastProvider`]. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Provider error (status {status}): {message}")]
    Provider {
        status: StatusCode,
        message: String,
    },
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Fetch the raw forecast for a free-form `"City,Region,Country"` location.
    async fn fetch(&self, location: &str) -> Result<RawForecastDocument, ForecastError>;
}
