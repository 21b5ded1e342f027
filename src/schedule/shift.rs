use crate::flight::FlightId;
use crate::schedule::schedule::Schedule;
use crate::time::Timestamp;
use serde::Serialize;

/// Shifts beyond a day are not schedule adjustments any more.
pub const MAX_SHIFT_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShiftError {
    #[error("max_shift must be within {max} minutes, got {0}", max = MAX_SHIFT_MINUTES)]
    RangeTooWide(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftParams {
    pub window: i64,
    pub max_shift: i64,
    pub step: i64,
}

impl Default for ShiftParams {
    fn default() -> Self {
        ShiftParams {
            window: Schedule::DEFAULT_WINDOW,
            max_shift: 30,
            step: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftSuggestion {
    pub flight: FlightId,
    pub orig_time: Timestamp,
    pub orig_score: i64,
    pub suggested_shift: i64,
    pub new_score: i64,
    pub suggested_time: Timestamp,
}

impl ShiftParams {
    pub fn validate(&self) -> Result<(), ShiftError> {
        if self.max_shift.saturating_abs() > MAX_SHIFT_MINUTES {
            return Err(ShiftError::RangeTooWide(self.max_shift));
        }
        Ok(())
    }
}

/// Shifts from `-max_shift` towards `+max_shift` in `step` increments.
/// A zero step or zero range yields only the unshifted candidate. The range
/// is capped at [`MAX_SHIFT_MINUTES`] either way.
pub fn candidate_shifts(max_shift: i64, step: i64) -> Vec<i64> {
    let max_shift = max_shift.saturating_abs().min(MAX_SHIFT_MINUTES);
    let step = step.saturating_abs();
    if max_shift == 0 || step == 0 {
        return vec![0];
    }
    (-max_shift..=max_shift)
        .step_by(usize::try_from(step).unwrap_or(usize::MAX))
        .collect()
}

impl Schedule {
    /// Grid-searches a departure shift for the single worst cascading flight.
    ///
    /// Only the chosen flight moves; the other flights of its aircraft keep
    /// their scheduled departures and no other score is re-evaluated.
    /// Returns `None` when the schedule has no flights.
    pub fn suggest_shift(&self, params: ShiftParams) -> Option<ShiftSuggestion> {
        let worst = self
            .cascade_scores(params.window)
            .into_iter()
            .reduce(|best, s| if s.score > best.score { s } else { best })?;
        let flight = worst.flight;
        let rotation = self.rotation(&flight.aircraft_id)?;
        let orig_time = flight.scheduled_departure;
        let delay = flight.delay_or_zero();

        let mut best = ShiftSuggestion {
            flight: flight.id.clone(),
            orig_time,
            orig_score: worst.score,
            suggested_shift: 0,
            new_score: worst.score,
            suggested_time: orig_time,
        };

        for shift in candidate_shifts(params.max_shift, params.step) {
            let shifted = orig_time + shift;
            let mut downstream = rotation.departures_within(shifted, params.window);
            // the flight's own slot is still in the rotation
            if shifted < orig_time && orig_time <= shifted + params.window {
                downstream = downstream.saturating_sub(1);
            }
            let score = delay.saturating_mul(downstream as i64);
            if score < best.new_score {
                best.suggested_shift = shift;
                best.new_score = score;
                best.suggested_time = shifted;
            }
        }
        Some(best)
    }
}
