//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The forecast provider abstraction and its OpenWeather client
//! - Aggregation of 3-hour entries into daily summaries
//! - Sequential per-location batch retrieval
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod model;
pub mod provider;

pub use aggregate::{MAX_DAYS, format_location_label, summarize};
pub use batch::{LocationOutcome, forecast_all};
pub use config::Config;
pub use model::{CityForecast, CityMetadata, DailySummary, RawForecastDocument, RawForecastEntry};
pub use provider::{ClientSettings, ForecastError, ForecastProvider, OpenWeatherClient, Units};
