use crate::aircraft::{AircraftId, Rotation};
use crate::flight::Flight;
use serde::Serialize;
use std::collections::HashMap;

/// A flight together with its cascade score for a given window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredFlight<'a> {
    pub flight: &'a Flight,
    pub downstream: usize,
    pub score: i64,
}

/// Serialized view of a [`ScoredFlight`], keyed like the source columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeRecord {
    #[serde(rename = "Flight_ID")]
    pub flight_id: String,
    #[serde(rename = "Airline")]
    pub airline: String,
    #[serde(rename = "Aircraft")]
    pub aircraft: String,
    #[serde(rename = "Scheduled_Departure")]
    pub scheduled_departure: String,
    #[serde(rename = "Delay_Minutes")]
    pub delay_minutes: Option<i64>,
    pub cascade_score: i64,
}

impl From<&ScoredFlight<'_>> for CascadeRecord {
    fn from(scored: &ScoredFlight<'_>) -> Self {
        CascadeRecord {
            flight_id: scored.flight.id.to_string(),
            airline: scored.flight.airline.to_string(),
            aircraft: scored.flight.aircraft_id.to_string(),
            scheduled_departure: scored.flight.scheduled_departure.to_string(),
            delay_minutes: scored.flight.delay_minutes,
            cascade_score: scored.score,
        }
    }
}

pub struct Schedule {
    pub flights: Vec<Flight>,
    rotations: HashMap<AircraftId, Rotation>,
}

impl Schedule {
    pub const DEFAULT_WINDOW: i64 = 120;

    /// Sorts flights by scheduled departure. The sort is stable, so flights
    /// departing together keep their file order.
    pub fn new(mut flights: Vec<Flight>) -> Schedule {
        flights.sort_by_key(|f| f.scheduled_departure);
        let mut rotations: HashMap<AircraftId, Rotation> = HashMap::new();
        flights.iter().for_each(|f| {
            rotations
                .entry(f.aircraft_id.clone())
                .or_default()
                .push(f.scheduled_departure)
        });
        let schedule = Schedule { flights, rotations };
        schedule.assert_invariants();
        schedule
    }

    pub fn rotation(&self, aircraft_id: &AircraftId) -> Option<&Rotation> {
        self.rotations.get(aircraft_id)
    }

    pub fn downstream_count(&self, flight: &Flight, window: i64) -> usize {
        self.rotation(&flight.aircraft_id)
            .map_or(0, |r| r.departures_within(flight.scheduled_departure, window))
    }

    /// Scores every flight, in schedule order.
    pub fn cascade_scores(&self, window: i64) -> Vec<ScoredFlight<'_>> {
        self.flights
            .iter()
            .map(|flight| {
                let downstream = self.downstream_count(flight, window);
                ScoredFlight {
                    flight,
                    downstream,
                    score: flight.delay_or_zero().saturating_mul(downstream as i64),
                }
            })
            .collect()
    }

    /// Highest scores first; equal scores stay in schedule order.
    pub fn top_cascade(&self, window: i64, top: usize) -> Vec<ScoredFlight<'_>> {
        let mut scored = self.cascade_scores(window);
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(top);
        scored
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.flights
                .windows(2)
                .all(|fs| fs[0].scheduled_departure <= fs[1].scheduled_departure),
            "Flights sorted by scheduled departure invariant violated"
        );
        debug_assert_eq!(
            self.flights.len(),
            self.rotations.values().map(Rotation::len).sum::<usize>(),
            "Every flight belongs to exactly one rotation invariant violated"
        );
    }
}
