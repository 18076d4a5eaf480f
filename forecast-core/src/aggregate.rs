//! Reduction of 3-hour forecast entries into per-day summaries.
//!
//! Calendar dates are taken in the offset carried by `now`, so the same
//! offset decides both what "tomorrow" is and which day an entry belongs to.

use chrono::{DateTime, Days, FixedOffset, NaiveDate};

use crate::model::{CityForecast, DailySummary, RawForecastDocument};

/// Number of days kept in a [`CityForecast`].
pub const MAX_DAYS: usize = 5;

/// Summarize a decoded forecast into at most [`MAX_DAYS`] daily summaries,
/// starting the day after `now`.
///
/// Entries are sorted by timestamp first; the input order is not trusted.
/// A document with nothing left after filtering yields an empty summary list.
pub fn summarize(
    doc: RawForecastDocument,
    location: &str,
    now: DateTime<FixedOffset>,
) -> CityForecast {
    let RawForecastDocument { city, mut entries } = doc;
    let offset = *now.offset();

    entries.sort_by_key(|entry| entry.timestamp);

    let mut days: Vec<DayAccumulator> = Vec::new();

    if let Some(first_eligible) = now.date_naive().checked_add_days(Days::new(1)) {
        for entry in &entries {
            let date = entry.timestamp.with_timezone(&offset).date_naive();
            if date < first_eligible {
                continue;
            }

            let entry_average = round_to_cents((entry.temp_min + entry.temp_max) / 2.0);

            // Sorted input means a new date can only follow the last group.
            match days.last_mut() {
                Some(day) if day.date == date => {
                    day.push(entry_average, entry.precipitation_probability)
                }
                _ => {
                    if days.len() == MAX_DAYS {
                        break;
                    }
                    let mut day = DayAccumulator::new(date);
                    day.push(entry_average, entry.precipitation_probability);
                    days.push(day);
                }
            }
        }
    }

    tracing::debug!(
        city_id = city.id,
        entries = entries.len(),
        days = days.len(),
        "summarized forecast"
    );

    CityForecast {
        location_label: format_location_label(location),
        city_id: city.id,
        daily_summaries: days.into_iter().map(DayAccumulator::finish).collect(),
    }
}

/// Display form of a location string: `"Austin,TX,US"` becomes `"Austin, TX, US"`.
pub fn format_location_label(location: &str) -> String {
    location.replace(',', ", ")
}

/// Round to two decimal places, ties to even.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

struct DayAccumulator {
    date: NaiveDate,
    temperature_sum: f64,
    precipitation_sum: f64,
    count: usize,
}

impl DayAccumulator {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            temperature_sum: 0.0,
            precipitation_sum: 0.0,
            count: 0,
        }
    }

    fn push(&mut self, entry_average: f64, precipitation_probability: f64) {
        self.temperature_sum += entry_average;
        self.precipitation_sum += precipitation_probability;
        self.count += 1;
    }

    fn finish(self) -> DailySummary {
        let count = self.count as f64;

        DailySummary {
            date: self.date,
            average_temperature: round_to_cents(self.temperature_sum / count),
            has_precipitation_chance: self.precipitation_sum / count > 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CityMetadata, RawForecastEntry};
    use chrono::{TimeZone, Utc};

    fn utc_now() -> DateTime<FixedOffset> {
        // 2026-10-19 15:00 UTC
        Utc.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap().fixed_offset()
    }

    fn entry(day: u32, hour: u32, min: f64, max: f64, pop: f64) -> RawForecastEntry {
        RawForecastEntry {
            timestamp: Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap(),
            temp_min: min,
            temp_max: max,
            precipitation_probability: pop,
        }
    }

    fn doc(entries: Vec<RawForecastEntry>) -> RawForecastDocument {
        RawForecastDocument {
            city: CityMetadata {
                id: 4943097,
                name: "Marlboro".to_string(),
            },
            entries,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    #[test]
    fn averages_two_stage_rounded_and_flags_precipitation() {
        let forecast = summarize(
            doc(vec![entry(20, 0, 60.0, 70.0, 0.1), entry(20, 3, 62.0, 72.0, 0.0)]),
            "Marlboro,MA,US",
            utc_now(),
        );

        assert_eq!(forecast.daily_summaries.len(), 1);
        let day = &forecast.daily_summaries[0];
        assert_eq!(day.date, date(20));
        assert_eq!(day.average_temperature, 66.0);
        assert!(day.has_precipitation_chance);
    }

    #[test]
    fn no_precipitation_when_all_probabilities_are_zero() {
        let forecast = summarize(
            doc(vec![entry(21, 0, 50.0, 52.0, 0.0), entry(21, 3, 51.0, 53.0, 0.0)]),
            "Austin,TX,US",
            utc_now(),
        );

        assert!(!forecast.daily_summaries[0].has_precipitation_chance);
    }

    #[test]
    fn per_entry_average_is_rounded_before_the_daily_mean() {
        // (60 + 70.25) / 2 = 65.125 -> 65.12 (ties to even)
        // (60 + 70.75) / 2 = 65.375 -> 65.38
        // mean(65.12, 65.38) = 65.25
        let forecast = summarize(
            doc(vec![entry(20, 0, 60.0, 70.25, 0.0), entry(20, 3, 60.0, 70.75, 0.0)]),
            "Austin,TX,US",
            utc_now(),
        );

        assert_eq!(forecast.daily_summaries[0].average_temperature, 65.25);
    }

    #[test]
    fn daily_mean_is_rounded_to_two_places() {
        // 65.00, 66.00, 66.00 -> 65.666.. -> 65.67
        let forecast = summarize(
            doc(vec![
                entry(22, 0, 60.0, 70.0, 0.0),
                entry(22, 3, 61.0, 71.0, 0.0),
                entry(22, 6, 61.0, 71.0, 0.0),
            ]),
            "Austin,TX,US",
            utc_now(),
        );

        assert_eq!(forecast.daily_summaries[0].average_temperature, 65.67);
    }

    #[test]
    fn excludes_today_and_past_entries() {
        let forecast = summarize(
            doc(vec![
                entry(18, 21, 40.0, 42.0, 0.5),
                entry(19, 18, 40.0, 42.0, 0.5),
                entry(19, 21, 40.0, 42.0, 0.5),
                entry(20, 0, 50.0, 52.0, 0.0),
            ]),
            "Austin,TX,US",
            utc_now(),
        );

        assert_eq!(forecast.daily_summaries.len(), 1);
        assert_eq!(forecast.daily_summaries[0].date, date(20));
        assert!(!forecast.daily_summaries[0].has_precipitation_chance);
    }

    #[test]
    fn empty_after_filtering_is_not_an_error() {
        let forecast = summarize(
            doc(vec![entry(19, 18, 40.0, 42.0, 0.5)]),
            "Austin,TX,US",
            utc_now(),
        );
        assert!(forecast.daily_summaries.is_empty());
        assert_eq!(forecast.city_id, 4943097);

        let forecast = summarize(doc(vec![]), "Austin,TX,US", utc_now());
        assert!(forecast.daily_summaries.is_empty());
    }

    #[test]
    fn keeps_only_first_five_days() {
        let entries = (20..=25).map(|day| entry(day, 12, 50.0, 60.0, 0.0)).collect();

        let forecast = summarize(doc(entries), "Austin,TX,US", utc_now());

        let dates: Vec<_> = forecast.daily_summaries.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(20), date(21), date(22), date(23), date(24)]);
    }

    #[test]
    fn unsorted_input_produces_ascending_days() {
        let forecast = summarize(
            doc(vec![
                entry(23, 0, 70.0, 70.0, 0.0),
                entry(20, 6, 50.0, 50.0, 0.0),
                entry(21, 0, 60.0, 60.0, 0.0),
                entry(20, 0, 52.0, 52.0, 0.0),
            ]),
            "Austin,TX,US",
            utc_now(),
        );

        let days = &forecast.daily_summaries;
        assert_eq!(days.len(), 3);
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(days[0].date, date(20));
        assert_eq!(days[0].average_temperature, 51.0);
    }

    #[test]
    fn unsorted_input_still_keeps_earliest_five_days() {
        let entries = (20..=25).rev().map(|day| entry(day, 12, 50.0, 60.0, 0.0)).collect();

        let forecast = summarize(doc(entries), "Austin,TX,US", utc_now());

        assert_eq!(forecast.daily_summaries.len(), MAX_DAYS);
        assert_eq!(forecast.daily_summaries[0].date, date(20));
        assert_eq!(forecast.daily_summaries[4].date, date(24));
    }

    #[test]
    fn reference_offset_decides_day_boundaries() {
        // 2026-10-20 02:00 UTC is still 2026-10-19 in UTC-05:00.
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = offset.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap();

        let forecast = summarize(
            doc(vec![entry(20, 2, 40.0, 40.0, 0.0), entry(20, 6, 60.0, 60.0, 0.0)]),
            "Cleveland,OH,US",
            now,
        );

        assert_eq!(forecast.daily_summaries.len(), 1);
        assert_eq!(forecast.daily_summaries[0].date, date(20));
        assert_eq!(forecast.daily_summaries[0].average_temperature, 60.0);
    }

    #[test]
    fn summarize_is_deterministic() {
        let input = doc(vec![
            entry(20, 0, 60.0, 70.0, 0.1),
            entry(21, 0, 62.0, 72.0, 0.0),
        ]);

        let first = summarize(input.clone(), "Austin,TX,US", utc_now());
        let second = summarize(input, "Austin,TX,US", utc_now());

        assert_eq!(first, second);
    }

    #[test]
    fn location_label_gets_space_after_commas() {
        assert_eq!(format_location_label("San Diego,CA,US"), "San Diego, CA, US");
        assert_eq!(format_location_label("Honolulu"), "Honolulu");
    }
}
