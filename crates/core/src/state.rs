use crate::{event::Message, snapshot::BatterySnapshot};
use serde::Serialize;

/// Everything the display needs from one poll, computed on the producer side.
///
/// Point sequences are `(x, y)` in each buffer's time coordinate, evaluated
/// at `taken_at`.
#[derive(Debug, Clone, Serialize)]
pub struct BatteryUpdate {
    /// Wall-clock seconds at which the snapshot was computed.
    pub taken_at: f64,
    pub snapshot: BatterySnapshot,
    /// Recent power samples in watts.
    pub power_history: Vec<(f64, f64)>,
    /// Recent gradient-free time estimates in hours.
    pub expected_time_history: Vec<(f64, f64)>,
    /// Capacity history, ending in the projected zero crossing when the
    /// trend is not flat.
    pub capacity_trend: Vec<(f64, f64)>,
    /// x coordinate of the projected zero crossing, when the capacity trend
    /// is not flat.  Equal to the last point of `capacity_trend` then.
    pub capacity_zero_crossing: Option<f64>,
    /// Mean of the power history, `None` before the first sample.
    pub power_average: Option<f64>,
}

/// Consumer-side state: the latest update and poll bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Most recent successful update.  Stays in place when a poll fails.
    pub latest: Option<BatteryUpdate>,
    /// Reason of the most recent failed poll, cleared on the next success.
    pub last_error: Option<String>,
    /// Number of successful polls received.
    pub polls: u64,
    /// Number of failed polls received.
    pub failures: u64,
}

impl AppState {
    /// Fold a monitor message into the state.
    pub fn apply(&mut self, message: Message) {
        match message {
            Message::Battery(update) => {
                self.latest = Some(*update);
                self.last_error = None;
                self.polls += 1;
            }
            Message::SensorFailed(reason) => {
                self.last_error = Some(reason);
                self.failures += 1;
            }
        }
    }

    pub fn snapshot(&self) -> Option<&BatterySnapshot> {
        self.latest.as_ref().map(|u| &u.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::RawReadings;

    fn update(taken_at: f64) -> BatteryUpdate {
        let raw = RawReadings {
            capacity: 80.0,
            current:  -500_000.0,
            voltage:  4_000_000.0,
            rated:    10_000_000.0,
            health:   "Good".into(),
            status:   "Discharging".into(),
        };
        BatteryUpdate {
            taken_at,
            snapshot: BatterySnapshot::from_readings(&raw, 0.0),
            power_history: vec![(0.0, -2.0)],
            expected_time_history: vec![(0.0, 4.0)],
            capacity_trend: vec![(0.0, 80.0)],
            capacity_zero_crossing: None,
            power_average: Some(-2.0),
        }
    }

    #[test]
    fn failure_keeps_previous_snapshot() {
        let mut state = AppState::default();
        state.apply(Message::Battery(Box::new(update(1.0))));
        state.apply(Message::SensorFailed("capacity missing".into()));

        assert_eq!(state.polls, 1);
        assert_eq!(state.failures, 1);
        assert_eq!(state.last_error.as_deref(), Some("capacity missing"));
        assert_eq!(state.latest.as_ref().map(|u| u.taken_at), Some(1.0));
        assert!(state.snapshot().is_some());
    }

    #[test]
    fn success_clears_last_error() {
        let mut state = AppState::default();
        state.apply(Message::SensorFailed("boom".into()));
        state.apply(Message::Battery(Box::new(update(2.0))));
        assert!(state.last_error.is_none());
    }
}
