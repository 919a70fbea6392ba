use powertrack_core::{PowertrackError, Result, TrackerConfig};
use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `powertrack.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowertrackConfig {
    /// Polling, source and output settings.
    pub global: GlobalConfig,
    /// Sampling settings for each history buffer.
    pub trackers: TrackersConfig,
    /// Static axis declarations for each trend graph.
    pub graphs: GraphsConfig,
}

impl PowertrackConfig {
    /// Reject settings that would make a buffer or graph meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.global.poll_interval_ms == 0 {
            return Err(PowertrackError::Config("global.poll_interval_ms must be > 0".into()));
        }
        for (name, tracker) in [
            ("power", &self.trackers.power),
            ("expected_time", &self.trackers.expected_time),
            ("capacity", &self.trackers.capacity),
        ] {
            if !tracker.frequency.is_finite() || tracker.frequency <= 0.0 {
                return Err(PowertrackError::Config(format!(
                    "trackers.{name}.frequency must be a positive number, got {}",
                    tracker.frequency
                )));
            }
            if tracker.capacity == 0 {
                return Err(PowertrackError::Config(format!(
                    "trackers.{name}.capacity must be > 0"
                )));
            }
        }
        self.graphs.power.validate("power")?;
        self.graphs.capacity.validate("capacity")?;
        Ok(())
    }
}

/// Global settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Interval between two battery polls in milliseconds.
    pub poll_interval_ms: u64,
    /// Explicit power-supply directory, e.g. `/sys/class/power_supply/BAT1`.
    /// Unset = auto-detect.
    pub battery_path: Option<String>,
    /// Use the synthetic battery instead of sysfs.
    pub mock: bool,
    /// How each update is printed.
    pub output: OutputFormat,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            battery_path:     None,
            mock:             false,
            output:           OutputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One [`TrackerConfig`] per tracked metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackersConfig {
    pub power:         TrackerConfig,
    pub expected_time: TrackerConfig,
    pub capacity:      TrackerConfig,
}

impl Default for TrackersConfig {
    fn default() -> Self {
        Self {
            power:         TrackerConfig::new(1.0, 30, true),
            expected_time: TrackerConfig::new(1.0, 30, true),
            // one sample every 2 min, 360 samples = 12 h window
            capacity:      TrackerConfig::new(1.0 / 120.0, 360, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphsConfig {
    pub power:    GraphConfig,
    pub capacity: GraphConfig,
}

impl Default for GraphsConfig {
    fn default() -> Self {
        Self {
            power: GraphConfig {
                x: AxisConfig::new("Time (s)", 2, -30.0, 0.0),
                y: AxisConfig::new("Power (W)", 17, -8.0, 8.0),
                margin: 0.1,
            },
            capacity: GraphConfig {
                x: AxisConfig::new("Time (h)", 5, -3600.0 * 12.0, 3600.0 * 12.0)
                    .with_scale(1.0 / 3600.0),
                y: AxisConfig::new("Capacity (%)", 5, 0.0, 100.0),
                margin: 0.1,
            },
        }
    }
}

/// Declarative description of one graph's coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub x: AxisConfig,
    pub y: AxisConfig,
    /// Fraction of the drawing area left blank around the plot.
    pub margin: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            x: AxisConfig::new("x", 2, 0.0, 1.0),
            y: AxisConfig::new("y", 2, 0.0, 1.0),
            margin: 0.1,
        }
    }
}

impl GraphConfig {
    fn validate(&self, name: &str) -> Result<()> {
        self.x.validate(name, "x")?;
        self.y.validate(name, "y")?;
        if !(0.0..1.0).contains(&self.margin) {
            return Err(PowertrackError::Config(format!(
                "graphs.{name}.margin must be in [0, 1)"
            )));
        }
        Ok(())
    }
}

/// A single axis: label, tick count, range and the factor applied to tick labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub label: String,
    pub tics:  u32,
    pub min:   f64,
    pub max:   f64,
    /// Multiplier from data units to label units (e.g. `1/3600` for s → h).
    pub scale_on_label: f64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self::new("", 2, 0.0, 1.0)
    }
}

impl AxisConfig {
    pub fn new(label: impl Into<String>, tics: u32, min: f64, max: f64) -> Self {
        Self {
            label: label.into(),
            tics,
            min,
            max,
            scale_on_label: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale_on_label = scale;
        self
    }

    /// Convert a data-space value into the unit shown on this axis' labels.
    pub fn to_label_units(&self, value: f64) -> f64 {
        value * self.scale_on_label
    }

    /// Whether `value` lies inside the declared range.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self, graph: &str, axis: &str) -> Result<()> {
        if !(self.min < self.max) {
            return Err(PowertrackError::Config(format!(
                "graphs.{graph}.{axis}: min ({}) must be below max ({})",
                self.min, self.max
            )));
        }
        if self.tics < 2 {
            return Err(PowertrackError::Config(format!(
                "graphs.{graph}.{axis}.tics must be at least 2"
            )));
        }
        Ok(())
    }
}
