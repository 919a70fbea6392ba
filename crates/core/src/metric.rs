use crate::snapshot::BatterySnapshot;
use serde::Serialize;
use std::fmt;

/// The snapshot quantities that keep a history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedMetric {
    /// Instantaneous power in watts (negative = discharging).
    Power,
    /// Gradient-free time estimate in hours.
    ExpectedTime,
    /// State of charge in percent.
    Capacity,
}

impl TrackedMetric {
    pub const ALL: [TrackedMetric; 3] = [Self::Power, Self::ExpectedTime, Self::Capacity];

    pub fn name(self) -> &'static str {
        match self {
            Self::Power        => "power",
            Self::ExpectedTime => "expected_time",
            Self::Capacity     => "capacity",
        }
    }

    /// Read this metric's numeric value out of a snapshot.
    ///
    /// Reads the raw value even when the measurement is flagged invalid,
    /// so sentinel values end up in the history as-is.
    pub fn value(self, snapshot: &BatterySnapshot) -> f64 {
        let measurement = match self {
            Self::Power        => &snapshot.power,
            Self::ExpectedTime => &snapshot.expected_time,
            Self::Capacity     => &snapshot.capacity,
        };
        measurement.as_number().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for TrackedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
