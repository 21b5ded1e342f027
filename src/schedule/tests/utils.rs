use crate::flight::Flight;
use crate::time::Timestamp;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

/// Minutes after 2024-01-01 00:00.
pub fn at(minutes: i64) -> Timestamp {
    ts("2024-01-01 00:00") + minutes
}

pub fn flight(flight_id: &str, aircraft_id: &str, departure: Timestamp, delay: Option<i64>) -> Flight {
    Flight {
        id: id(flight_id),
        airline: id("Air India"),
        destination: id("DEL"),
        aircraft_id: id(aircraft_id),
        scheduled_departure: departure,
        actual_departure: delay.map(|d| departure + d),
        scheduled_arrival: departure + 90,
        actual_arrival: delay.map(|d| departure + 90 + d),
        delay_minutes: delay,
    }
}

pub fn add_flight(
    flights: &mut Vec<Flight>,
    flight_id: &str,
    aircraft_id: &str,
    departure: &str,
    delay: Option<i64>,
) {
    flights.push(flight(flight_id, aircraft_id, ts(departure), delay));
}

pub fn arb_id(prefix: &'static str) -> impl Strategy<Value = Arc<str>> {
    prop_oneof![
        Just(Arc::from(format!("{}_1", prefix))),
        Just(Arc::from(format!("{}_2", prefix))),
        Just(Arc::from(format!("{}_3", prefix))),
    ]
}

pub fn arb_flight() -> impl Strategy<Value = Flight> {
    (
        arb_id("FL"),
        arb_id("AC"),
        0..600i64,
        proptest::option::of(-30..180i64),
    )
        .prop_map(|(fid, ac, dep, delay)| flight(&fid, &ac, at(dep), delay))
}
