use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::model::{CityMetadata, RawForecastDocument, RawForecastEntry};

use super::{ClientSettings, ForecastError, ForecastProvider};

/// Client for OpenWeather's 5 day / 3 hour forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    settings: ClientSettings,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ForecastError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .gzip(true)
            .deflate(true)
            .build()?;

        Ok(Self { settings, http })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherClient {
    async fn fetch(&self, location: &str) -> Result<RawForecastDocument, ForecastError> {
        tracing::debug!(location, units = %self.settings.units, "requesting forecast");

        let res = self
            .http
            .get(&self.settings.endpoint)
            .query(&[
                ("q", location),
                ("appid", self.settings.api_key.as_str()),
                ("units", self.settings.units.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        tracing::debug!(location, %status, bytes = body.len(), "forecast response received");

        if !status.is_success() {
            return Err(ForecastError::Provider {
                status,
                message: error_message(&body),
            });
        }

        decode_forecast(status, &body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    #[serde(with = "chrono::serde::ts_seconds")]
    dt: DateTime<Utc>,
    main: OwMain,
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

/// Malformed JSON and API-level failures (`cod` other than 200) are provider
/// errors; JSON that does not fit the schema is a decode error.
fn decode_forecast(status: StatusCode, body: &str) -> Result<RawForecastDocument, ForecastError> {
    let value: Value = serde_json::from_str(body).map_err(|err| ForecastError::Provider {
        status,
        message: format!("malformed forecast payload ({err}): {}", truncate_body(body)),
    })?;

    if let Some(code) = value.get("cod").and_then(api_code).filter(|code| *code != 200) {
        return Err(ForecastError::Provider {
            status: StatusCode::from_u16(code).unwrap_or(status),
            message: error_message(body),
        });
    }

    let parsed: OwForecastResponse = serde_json::from_value(value).map_err(ForecastError::Decode)?;

    Ok(RawForecastDocument {
        city: CityMetadata {
            id: parsed.city.id,
            name: parsed.city.name,
        },
        entries: parsed
            .list
            .into_iter()
            .map(|entry| RawForecastEntry {
                timestamp: entry.dt,
                temp_min: entry.main.temp_min,
                temp_max: entry.main.temp_max,
                precipitation_probability: entry.pop,
            })
            .collect(),
    })
}

/// OpenWeather sends `cod` either as a string or as a number.
fn api_code(value: &Value) -> Option<u16> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        _ => None,
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .map(|err| err.message)
        .unwrap_or_else(|_| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
