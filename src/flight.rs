use crate::aircraft::AircraftId;
use crate::time::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

pub type FlightId = Arc<str>;

/// One row of the flight dataset. Field names follow the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    #[serde(rename = "Flight_ID")]
    pub id: FlightId,
    #[serde(rename = "Airline")]
    pub airline: Arc<str>,
    #[serde(rename = "Destination")]
    pub destination: Arc<str>,
    #[serde(rename = "Aircraft")]
    pub aircraft_id: AircraftId,
    #[serde(rename = "Scheduled_Departure")]
    pub scheduled_departure: Timestamp,
    #[serde(rename = "Actual_Departure")]
    pub actual_departure: Option<Timestamp>,
    #[serde(rename = "Scheduled_Arrival")]
    pub scheduled_arrival: Timestamp,
    #[serde(rename = "Actual_Arrival")]
    pub actual_arrival: Option<Timestamp>,
    #[serde(rename = "Delay_Minutes", deserialize_with = "delay_minutes")]
    pub delay_minutes: Option<i64>,
}

impl Flight {
    /// Delay used for scoring; a missing value counts as no delay.
    pub fn delay_or_zero(&self) -> i64 {
        self.delay_minutes.unwrap_or(0)
    }

    pub fn matches(&self, needle_lowercase: &str) -> bool {
        [&self.id, &self.airline, &self.destination]
            .iter()
            .any(|field| field.to_lowercase().contains(needle_lowercase))
    }
}

/// Delays beyond this many minutes, either way, are rejected as malformed.
const MAX_DELAY_MINUTES: i64 = i32::MAX as i64;

// Spreadsheet exports write whole minutes as "12.0" once a column has gaps.
fn delay_minutes<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .ok()
            .or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && v.abs() <= MAX_DELAY_MINUTES as f64)
                    .map(|v| v.trunc() as i64)
            })
            .filter(|v| (-MAX_DELAY_MINUTES..=MAX_DELAY_MINUTES).contains(v))
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid delay minutes '{s}'"))),
    }
}
