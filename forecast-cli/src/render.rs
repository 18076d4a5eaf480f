use chrono::{DateTime, FixedOffset};
use serde_json::{Value, json};

use forecast_core::{CityForecast, LocationOutcome, Units};

const RULE: &str = "-----------------------------";
const DATE_COLUMN: usize = 17;

/// Plain-text report: a timestamp header followed by one table per location.
pub fn report(outcomes: &[LocationOutcome], units: Units, now: DateTime<FixedOffset>) -> String {
    let mut out = format!("Current datetime: {}\n\n", now.format("%m/%d/%Y %H:%M"));

    for outcome in outcomes {
        match &outcome.result {
            Ok(forecast) => out.push_str(&city_table(forecast, units)),
            Err(err) => out.push_str(&format!(
                "Something went wrong fetching the forecast for {}: {err}\n\n",
                outcome.location
            )),
        }
    }

    out
}

pub fn city_table(forecast: &CityForecast, units: Units) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("{} ({})\n\n", forecast.location_label, forecast.city_id));
    out.push_str(&format!(
        "{:<width$}Avg Temp ({})\n",
        "Date",
        units.temperature_symbol(),
        width = DATE_COLUMN
    ));
    out.push_str(RULE);
    out.push('\n');

    if forecast.daily_summaries.is_empty() {
        out.push_str("No forecast days available\n");
    }

    for day in &forecast.daily_summaries {
        // `*` marks a chance of precipitation.
        let mark = if day.has_precipitation_chance { "*" } else { " " };
        let date = format!("{}{mark}", day.date.format("%m/%d/%Y"));
        out.push_str(&format!(
            "{date:<width$}{:.2}°\n",
            day.average_temperature,
            width = DATE_COLUMN
        ));
    }

    out.push('\n');
    out
}

/// JSON array with one element per location; failures carry an `error` field.
pub fn outcomes_json(outcomes: &[LocationOutcome]) -> serde_json::Result<Value> {
    outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(forecast) => serde_json::to_value(forecast),
            Err(err) => Ok(json!({
                "location": outcome.location,
                "error": err.to_string(),
            })),
        })
        .collect::<serde_json::Result<Vec<_>>>()
        .map(Value::Array)
}
