use serde::Serialize;
use std::fmt;

/// Scale factor between the platform's micro-units and SI units.
pub const MICRO: f64 = 1_000_000.0;

/// Seconds per hour; the gradient estimate is computed in seconds.
pub const SECS_PER_HOUR: f64 = 3600.0;

/// Sentinel for "no estimate" in the depletion-time fields.
pub const NO_ESTIMATE: f64 = -1.0;

/// Placeholder shown for any invalid measurement.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder shown while the gradient estimate is still accumulating history.
pub const ESTIMATING: &str = "Estimating...";

/// Underlying value of a [`MeasurementValue`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

/// A value together with its unit and whether it is meaningful to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementValue {
    pub raw_value:           RawValue,
    pub unit:                &'static str,
    pub is_valid:            bool,
    pub invalid_placeholder: &'static str,
}

impl MeasurementValue {
    pub fn number(value: f64, unit: &'static str, is_valid: bool) -> Self {
        Self {
            raw_value: RawValue::Number(value),
            unit,
            is_valid,
            invalid_placeholder: NOT_AVAILABLE,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            raw_value: RawValue::Text(value.into()),
            unit: "",
            is_valid: true,
            invalid_placeholder: NOT_AVAILABLE,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.invalid_placeholder = placeholder;
        self
    }

    /// The numeric raw value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self.raw_value {
            RawValue::Number(v) => Some(v),
            RawValue::Text(_)   => None,
        }
    }
}

impl fmt::Display for MeasurementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid {
            return f.write_str(self.invalid_placeholder);
        }
        match &self.raw_value {
            RawValue::Number(v) => write!(f, "{v:.1}{}", self.unit),
            RawValue::Text(s)   => f.write_str(s.trim()),
        }
    }
}

/// Raw readings as delivered by a battery source, in platform units.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReadings {
    /// Percent.
    pub capacity: f64,
    /// Micro-amps, signed (negative = discharging).
    pub current:  f64,
    /// Micro-volts.
    pub voltage:  f64,
    /// Micro-units of design capacity.
    pub rated:    f64,
    pub health:   String,
    pub status:   String,
}

impl RawReadings {
    pub fn current_amps(&self) -> f64 {
        self.current / MICRO
    }

    pub fn voltage_volts(&self) -> f64 {
        self.voltage / MICRO
    }

    pub fn rated_units(&self) -> f64 {
        self.rated / MICRO
    }

    /// Instantaneous power in watts.  Positive while charging.
    pub fn power(&self) -> f64 {
        self.current_amps() * self.voltage_volts()
    }
}

/// One fully computed set of battery metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatterySnapshot {
    pub capacity:                  MeasurementValue,
    pub current:                   MeasurementValue,
    pub voltage:                   MeasurementValue,
    pub rated:                     MeasurementValue,
    pub health:                    MeasurementValue,
    pub status:                    MeasurementValue,
    pub expected_time:             MeasurementValue,
    pub power:                     MeasurementValue,
    pub expected_time_by_gradient: MeasurementValue,
}

impl BatterySnapshot {
    /// Build a snapshot from raw readings and the capacity trend (percent per
    /// second) observed before this reading.
    pub fn from_readings(raw: &RawReadings, capacity_gradient: f64) -> Self {
        let capacity = raw.capacity;
        let current  = raw.current_amps();
        let voltage  = raw.voltage_volts();
        let rated    = raw.rated_units();
        let power    = raw.power();
        let discharging = power < 0.0;

        let expected_time = if power != 0.0 {
            ((capacity / 100.0) * (rated / power)).abs()
        } else {
            NO_ESTIMATE
        };

        // seconds until the capacity trend reaches zero
        let by_gradient = if capacity_gradient != 0.0 {
            -capacity / capacity_gradient
        } else {
            NO_ESTIMATE
        };

        Self {
            capacity: MeasurementValue::number(
                capacity,
                "%",
                (0.0..=100.0).contains(&capacity),
            ),
            current: MeasurementValue::number(current, "A", true),
            voltage: MeasurementValue::number(voltage, "V", voltage >= 0.0),
            rated:   MeasurementValue::number(rated, "A", rated >= 0.0),
            health:  MeasurementValue::text(raw.health.clone()),
            status:  MeasurementValue::text(raw.status.clone()),
            expected_time: MeasurementValue::number(
                expected_time,
                "h",
                expected_time >= 0.0 && discharging,
            ),
            power: MeasurementValue::number(power, "W", true),
            expected_time_by_gradient: MeasurementValue::number(
                by_gradient / SECS_PER_HOUR,
                "h",
                by_gradient >= 0.0 && discharging,
            )
            .with_placeholder(ESTIMATING),
        }
    }

    /// `(label, value)` pairs in display order.
    pub fn fields(&self) -> [(&'static str, &MeasurementValue); 9] {
        [
            ("Capacity", &self.capacity),
            ("Current", &self.current),
            ("Voltage", &self.voltage),
            ("Rated", &self.rated),
            ("Health", &self.health),
            ("Status", &self.status),
            ("Time at power", &self.expected_time),
            ("Power", &self.power),
            ("Expected time", &self.expected_time_by_gradient),
        ]
    }
}
