use crate::metric::TrackedMetric;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One recorded value and the wall-clock second it was taken at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time:  f64,
    pub value: f64,
}

/// Sampling settings for a single [`TimeSeriesBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Maximum accepted samples per second.  `1/frequency` is the gating interval.
    pub frequency: f64,
    /// Maximum number of retained samples.
    pub capacity: usize,
    /// Report x coordinates as (negative) offsets from the query time.
    pub relative_time: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            frequency:     1.0,
            capacity:      30,
            relative_time: true,
        }
    }
}

impl TrackerConfig {
    pub fn new(frequency: f64, capacity: usize, relative_time: bool) -> Self {
        Self { frequency, capacity, relative_time }
    }

    /// Minimum number of seconds between two accepted samples.
    pub fn period(&self) -> f64 {
        1.0 / self.frequency
    }
}

/// Fixed-capacity, frequency-gated history of one tracked metric.
///
/// `update` may be called as often as the caller likes; a sample is only
/// stored once a full gating period has elapsed since the last stored one.
/// When full, the oldest sample is evicted first.
#[derive(Debug, Clone)]
pub struct TimeSeriesBuffer {
    metric:   TrackedMetric,
    config:   TrackerConfig,
    samples:  VecDeque<Sample>,
    /// `None` = never sampled (or reset), so the next update always records.
    last_recorded: Option<f64>,
}

impl TimeSeriesBuffer {
    pub fn new(metric: TrackedMetric, config: TrackerConfig) -> Self {
        Self {
            metric,
            config,
            samples: VecDeque::with_capacity(config.capacity),
            last_recorded: None,
        }
    }

    pub fn metric(&self) -> TrackedMetric {
        self.metric
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Offer a new value.  Returns `true` if it was recorded.
    pub fn update(&mut self, value: f64, now: f64) -> bool {
        if let Some(last) = self.last_recorded {
            if now < last + self.config.period() {
                return false;
            }
        }

        while self.samples.len() >= self.config.capacity.max(1) {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { time: now, value });
        self.last_recorded = Some(now);

        tracing::debug!(metric = %self.metric, value, len = self.samples.len(), "sample recorded");
        true
    }

    /// Forget all samples; the next `update` records unconditionally.
    pub fn reset(&mut self) {
        if !self.samples.is_empty() {
            tracing::debug!(metric = %self.metric, dropped = self.samples.len(), "history reset");
        }
        self.samples.clear();
        self.last_recorded = None;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last_recorded_time(&self) -> Option<f64> {
        self.last_recorded
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// Map a stored timestamp into the buffer's x coordinate.
    fn x_of(&self, time: f64, now: f64) -> f64 {
        if self.config.relative_time {
            time - now
        } else {
            time
        }
    }

    /// The stored samples as `(x, y)` points, oldest first.
    ///
    /// With `relative_time` the x values are offsets from `now`, so every
    /// point lies at `x <= 0` when `now` is not in the past.
    pub fn get_xy_history(&self, now: f64) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .map(|s| (self.x_of(s.time, now), s.value))
            .collect()
    }

    /// Arithmetic mean of the stored values, `None` when empty.
    pub fn get_average(&self) -> Option<f64> {
        match self.samples.len() {
            0 => None,
            1 => Some(self.samples[0].value),
            n => Some(self.samples.iter().map(|s| s.value).sum::<f64>() / n as f64),
        }
    }

    /// Sum of values spread over the covered span plus one sampling period,
    /// normalised to the sampling frequency.
    pub fn get_average_over_time(&self) -> Option<f64> {
        let (first, last) = match (self.samples.front(), self.samples.back()) {
            (Some(f), Some(l)) => (f, l),
            _ => return None,
        };
        if self.samples.len() < 2 {
            return Some(first.value);
        }

        // |---|---|--- : n samples cover n periods, not n - 1
        let span = last.time - first.time + self.config.period();
        if span <= 0.0 {
            return self.get_average();
        }
        let sum: f64 = self.samples.iter().map(|s| s.value).sum();
        Some(sum / span / self.config.frequency)
    }

    /// Slope between the oldest and newest sample in value units per second.
    ///
    /// Zero with fewer than two samples or a zero-length time span.
    pub fn get_gradient(&self) -> f64 {
        let (first, last) = match (self.samples.front(), self.samples.back()) {
            (Some(f), Some(l)) if self.samples.len() >= 2 => (f, l),
            _ => return 0.0,
        };
        let span = last.time - first.time;
        if span == 0.0 {
            return 0.0;
        }
        (last.value - first.value) / span
    }

    /// Time (in absolute seconds) at which the trend through the newest
    /// sample reaches zero, if the buffer has a non-flat trend.
    pub fn zero_crossing_time(&self) -> Option<f64> {
        if self.samples.len() < 2 {
            return None;
        }
        let gradient = self.get_gradient();
        if gradient == 0.0 {
            return None;
        }
        let last = self.samples.back()?;
        Some(last.time - last.value / gradient)
    }

    /// The zero crossing in this buffer's x coordinate.
    pub fn get_zero_crossing(&self, now: f64) -> Option<f64> {
        self.zero_crossing_time().map(|t| self.x_of(t, now))
    }

    /// [`get_xy_history`](Self::get_xy_history) extended with the projected
    /// zero crossing as a final `(x, 0.0)` point.
    pub fn get_gradient_line(&self, now: f64) -> Vec<(f64, f64)> {
        let mut points = self.get_xy_history(now);
        if let Some(x) = self.get_zero_crossing(now) {
            points.push((x, 0.0));
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn absolute(frequency: f64, capacity: usize) -> TimeSeriesBuffer {
        TimeSeriesBuffer::new(
            TrackedMetric::Capacity,
            TrackerConfig::new(frequency, capacity, false),
        )
    }

    #[test]
    fn first_update_always_records() {
        let mut buf = absolute(1.0 / 120.0, 10);
        assert!(buf.update(42.0, 0.0));
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.last_recorded_time(), Some(0.0));
    }

    #[test]
    fn updates_inside_gating_interval_are_ignored() {
        let mut buf = absolute(1.0, 30);
        buf.update(1.0, 0.0);
        assert!(!buf.update(2.0, 0.5));
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.values(), vec![1.0]);
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut buf = absolute(1.0, 3);
        for t in 0..4 {
            buf.update(t as f64, t as f64);
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn gradient_of_two_points() {
        let mut buf = absolute(1.0, 30);
        buf.update(10.0, 0.0);
        buf.update(0.0, 10.0);
        assert!(close(buf.get_gradient(), -1.0));
    }

    #[test]
    fn gradient_needs_two_samples() {
        let mut buf = absolute(1.0, 30);
        assert_eq!(buf.get_gradient(), 0.0);
        buf.update(5.0, 0.0);
        assert_eq!(buf.get_gradient(), 0.0);
    }

    #[test]
    fn zero_time_span_has_flat_gradient() {
        // An unbounded frequency accepts a second sample at the same instant.
        let mut buf = absolute(f64::INFINITY, 30);
        assert!(buf.update(80.0, 5.0));
        assert!(buf.update(70.0, 5.0));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.get_gradient(), 0.0);
        assert_eq!(buf.zero_crossing_time(), None);
        assert_eq!(buf.get_gradient_line(5.0), buf.get_xy_history(5.0));
    }

    #[test]
    fn gradient_line_collapses_when_last_value_is_zero() {
        let mut buf = absolute(1.0, 30);
        buf.update(10.0, 0.0);
        buf.update(0.0, 10.0);
        let line = buf.get_gradient_line(10.0);
        assert_eq!(line.len(), 3);
        assert_eq!(line[0], (0.0, 10.0));
        assert_eq!(line[1], (10.0, 0.0));
        assert!(close(line[2].0, 10.0));
        assert_eq!(line[2].1, 0.0);
    }

    #[test]
    fn gradient_line_extrapolates_depletion() {
        let mut buf = absolute(1.0, 30);
        buf.update(100.0, 0.0);
        buf.update(90.0, 100.0);
        // -0.1 per second from 90 reaches zero 900 s after the last sample
        let line = buf.get_gradient_line(100.0);
        assert_eq!(line.len(), 3);
        assert!(close(line[2].0, 1000.0));
    }

    #[test]
    fn gradient_line_without_trend_is_plain_history() {
        let mut buf = absolute(1.0, 30);
        buf.update(50.0, 0.0);
        buf.update(50.0, 5.0);
        assert_eq!(buf.get_gradient_line(5.0), buf.get_xy_history(5.0));
    }

    #[test]
    fn relative_history_is_offset_from_now() {
        let mut buf = TimeSeriesBuffer::new(TrackedMetric::Power, TrackerConfig::default());
        buf.update(-2.0, 100.0);
        buf.update(-3.0, 101.0);

        let first = buf.get_xy_history(103.0);
        assert_eq!(first, vec![(-3.0, -2.0), (-2.0, -3.0)]);
        assert!(first.iter().all(|(x, _)| *x <= 0.0));

        // offsets move with the query time, not the append time
        let later = buf.get_xy_history(110.0);
        assert_eq!(later[0].0, -10.0);
    }

    #[test]
    fn relative_gradient_line_uses_same_coordinates() {
        let mut buf = TimeSeriesBuffer::new(TrackedMetric::Capacity, TrackerConfig::default());
        buf.update(100.0, 1000.0);
        buf.update(90.0, 1100.0);
        let line = buf.get_gradient_line(1100.0);
        assert!(close(line[2].0, 900.0));
    }

    #[test]
    fn average_contract() {
        let mut buf = absolute(1.0, 30);
        assert_eq!(buf.get_average(), None);
        buf.update(4.0, 0.0);
        assert_eq!(buf.get_average(), Some(4.0));
        buf.update(8.0, 1.0);
        assert_eq!(buf.get_average(), Some(6.0));
    }

    #[test]
    fn average_over_time_counts_one_extra_period() {
        let mut buf = absolute(1.0, 30);
        assert_eq!(buf.get_average_over_time(), None);
        buf.update(2.0, 0.0);
        buf.update(2.0, 1.0);
        buf.update(2.0, 2.0);
        // 6 / (2 + 1) / 1
        assert!(close(buf.get_average_over_time().unwrap_or_default(), 2.0));
    }

    #[test]
    fn reset_clears_samples_and_gating() {
        let mut buf = absolute(1.0, 30);
        buf.update(1.0, 0.0);
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.last_recorded_time(), None);
        // would have been gated without the reset
        assert!(buf.update(2.0, 0.1));
    }
}
