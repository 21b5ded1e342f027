//! Table reductions over the raw dataset: departure slot counts, delay
//! summaries and free-text search.

use crate::flight::Flight;
use crate::time::Timestamp;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCounts {
    pub labels: Vec<String>,
    pub data: Vec<usize>,
}

/// Counts scheduled departures per `hour_bucket`-hour slot, busiest first.
/// Slots with equal counts are listed chronologically.
pub fn busiest_slots(flights: &[Flight], hour_bucket: u32, top: usize) -> SlotCounts {
    let counts = flights
        .iter()
        .map(|f| f.scheduled_departure.floor_hours(hour_bucket))
        .fold(BTreeMap::new(), |mut acc: BTreeMap<Timestamp, usize>, slot| {
            *acc.entry(slot).or_default() += 1;
            acc
        });

    let mut ranked = counts.into_iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top);

    let (labels, data) = ranked
        .into_iter()
        .map(|(slot, count)| (slot.to_string(), count))
        .unzip();
    SlotCounts { labels, data }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirlineDelay {
    #[serde(rename = "Airline")]
    pub airline: String,
    #[serde(rename = "Delay_Minutes")]
    pub mean_delay: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayStats {
    pub total_flights: usize,
    pub delayed_flights: usize,
    pub avg_delay_min: Option<f64>,
    pub median_delay_min: Option<f64>,
    pub by_airline: Vec<AirlineDelay>,
}

/// Summarises departure delays. Flights without a recorded delay count
/// towards the total but are left out of the averages.
pub fn delay_stats(flights: &[Flight], delayed_threshold: i64) -> DelayStats {
    let delays = flights
        .iter()
        .filter_map(|f| f.delay_minutes)
        .collect::<Vec<_>>();

    let by_airline = flights
        .iter()
        .fold(BTreeMap::new(), |mut acc: BTreeMap<&str, Vec<i64>>, f| {
            let entry = acc.entry(&*f.airline).or_default();
            if let Some(d) = f.delay_minutes {
                entry.push(d);
            }
            acc
        })
        .into_iter()
        .map(|(airline, delays)| AirlineDelay {
            airline: airline.to_string(),
            mean_delay: mean(&delays),
        })
        .collect();

    DelayStats {
        total_flights: flights.len(),
        delayed_flights: delays.iter().filter(|d| **d > delayed_threshold).count(),
        avg_delay_min: mean(&delays),
        median_delay_min: median(&delays),
        by_airline,
    }
}

/// Case-insensitive substring match on flight id, airline and destination.
/// The query is used as typed, whitespace included; an empty query matches
/// everything.
pub fn search_flights<'a>(flights: &'a [Flight], query: &str, limit: usize) -> Vec<&'a Flight> {
    let needle = query.to_lowercase();
    flights
        .iter()
        .filter(|f| needle.is_empty() || f.matches(&needle))
        .take(limit)
        .collect()
}

fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64)
}

fn median(values: &[i64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => None,
        n if n % 2 == 1 => Some(sorted[mid] as f64),
        _ => Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0),
    }
}
