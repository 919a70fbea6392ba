use crate::battery::BatterySource;
use powertrack_core::{
    BatterySnapshot, BatteryUpdate, Result, TimeSeriesBuffer, TrackedMetric, TrackerConfig,
};

/// Turns raw battery readings into snapshots and keeps the trend histories.
///
/// Owns the source and three buffers (power, expected time, capacity).
/// Meant to live on a single task; nothing here locks.
#[derive(Debug)]
pub struct BatteryTracker<S> {
    source:                S,
    power_history:         TimeSeriesBuffer,
    expected_time_history: TimeSeriesBuffer,
    capacity_history:      TimeSeriesBuffer,
}

impl<S: BatterySource> BatteryTracker<S> {
    pub fn new(
        source: S,
        power: TrackerConfig,
        expected_time: TrackerConfig,
        capacity: TrackerConfig,
    ) -> Self {
        Self {
            source,
            power_history:         TimeSeriesBuffer::new(TrackedMetric::Power, power),
            expected_time_history: TimeSeriesBuffer::new(TrackedMetric::ExpectedTime, expected_time),
            capacity_history:      TimeSeriesBuffer::new(TrackedMetric::Capacity, capacity),
        }
    }

    pub fn history(&self, metric: TrackedMetric) -> &TimeSeriesBuffer {
        match metric {
            TrackedMetric::Power        => &self.power_history,
            TrackedMetric::ExpectedTime => &self.expected_time_history,
            TrackedMetric::Capacity     => &self.capacity_history,
        }
    }

    fn history_mut(&mut self, metric: TrackedMetric) -> &mut TimeSeriesBuffer {
        match metric {
            TrackedMetric::Power        => &mut self.power_history,
            TrackedMetric::ExpectedTime => &mut self.expected_time_history,
            TrackedMetric::Capacity     => &mut self.capacity_history,
        }
    }

    /// Read the source, compute a snapshot and feed the histories.
    ///
    /// All reads happen before any buffer is touched, so an error leaves
    /// the histories exactly as they were.
    pub fn snapshot(&mut self, now: f64) -> Result<BatterySnapshot> {
        let raw = self.source.read_all()?;

        // charging: a capacity slope across the transition means nothing
        if raw.power() > 0.0 {
            self.capacity_history.reset();
        }

        let capacity_gradient = self.capacity_history.get_gradient();
        let snapshot = BatterySnapshot::from_readings(&raw, capacity_gradient);

        for metric in TrackedMetric::ALL {
            let value = metric.value(&snapshot);
            self.history_mut(metric).update(value, now);
        }

        Ok(snapshot)
    }

    /// [`snapshot`](Self::snapshot) plus the series the display draws.
    pub fn poll(&mut self, now: f64) -> Result<BatteryUpdate> {
        let snapshot = self.snapshot(now)?;
        Ok(BatteryUpdate {
            taken_at: now,
            snapshot,
            power_history:          self.power_history.get_xy_history(now),
            expected_time_history:  self.expected_time_history.get_xy_history(now),
            capacity_trend:         self.capacity_history.get_gradient_line(now),
            capacity_zero_crossing: self.capacity_history.get_zero_crossing(now),
            power_average:          self.power_history.get_average(),
        })
    }
}
