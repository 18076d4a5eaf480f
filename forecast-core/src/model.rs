use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One 3-hour measurement as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Fraction in `[0, 1]`.
    pub precipitation_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityMetadata {
    pub id: i64,
    pub name: String,
}

/// Decoded provider response. `entries` keeps the order the provider sent.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecastDocument {
    pub city: CityMetadata,
    pub entries: Vec<RawForecastEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub average_temperature: f64,
    pub has_precipitation_chance: bool,
}

/// Per-city result handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityForecast {
    pub location_label: String,
    pub city_id: i64,
    /// At most five days, strictly ascending by date.
    pub daily_summaries: Vec<DailySummary>,
}
