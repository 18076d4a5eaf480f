//! Sequential forecast retrieval for a list of locations.

use chrono::{DateTime, FixedOffset};

use crate::{
    aggregate::summarize,
    model::CityForecast,
    provider::{ForecastError, ForecastProvider},
};

/// Result for one requested location. A failed location never aborts the batch.
#[derive(Debug)]
pub struct LocationOutcome {
    pub location: String,
    pub result: Result<CityForecast, ForecastError>,
}

impl LocationOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fetch and summarize every location in order, one request at a time.
///
/// Outcomes are returned in the same order as `locations`.
pub async fn forecast_all(
    provider: &dyn ForecastProvider,
    locations: &[String],
    now: DateTime<FixedOffset>,
) -> Vec<LocationOutcome> {
    let mut outcomes = Vec::with_capacity(locations.len());

    for location in locations {
        let result = provider
            .fetch(location)
            .await
            .map(|doc| summarize(doc, location, now));

        if let Err(err) = &result {
            tracing::warn!(location = %location, error = %err, "forecast failed, continuing");
        }

        outcomes.push(LocationOutcome {
            location: location.clone(),
            result,
        });
    }

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    tracing::info!(total = outcomes.len(), failed, "forecast batch finished");

    outcomes
}
