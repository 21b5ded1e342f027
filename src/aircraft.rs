use crate::time::Timestamp;
use std::sync::Arc;

pub type AircraftId = Arc<str>;

/// Scheduled departures flown by one physical aircraft, kept in ascending order.
#[derive(Debug, Default, Clone)]
pub struct Rotation {
    departures: Vec<Timestamp>,
}

impl Rotation {
    /// Departures must be pushed in non-decreasing order.
    pub(crate) fn push(&mut self, departure: Timestamp) {
        debug_assert!(self.departures.last().is_none_or(|last| *last <= departure));
        self.departures.push(departure);
    }

    pub fn len(&self) -> usize {
        self.departures.len()
    }

    /// Number of departures in `(after, after + window]`.
    pub fn departures_within(&self, after: Timestamp, window: i64) -> usize {
        if window <= 0 {
            return 0;
        }
        let until = after + window;
        let start = self.departures.partition_point(|t| *t <= after);
        let end = self.departures.partition_point(|t| *t <= until);
        end - start
    }
}
