use powertrack_core::{PowertrackError, RawReadings, Result};
use std::path::{Path, PathBuf};

/// Root of the Linux power-supply class.
pub const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// Supply names tried in order when no path is configured.
///
/// PinePhone Pro and PinePhone PMICs first, then the usual laptop names.
pub const KNOWN_BATTERIES: [&str; 5] = ["rk818-battery", "axp20x-battery", "BAT0", "BAT1", "BAT2"];

/// Anything that can report a battery's raw electrical state.
///
/// Current, voltage and rated capacity are in micro-units as the kernel
/// reports them.  Every read may fail independently.
pub trait BatterySource: Send {
    fn read_capacity(&mut self) -> Result<f64>;
    fn read_current(&mut self) -> Result<f64>;
    fn read_voltage(&mut self) -> Result<f64>;
    fn read_rated(&mut self) -> Result<f64>;
    fn read_health(&mut self) -> Result<String>;
    fn read_status(&mut self) -> Result<String>;

    /// Read everything for one poll.  Fails as a whole if any read fails.
    fn read_all(&mut self) -> Result<RawReadings> {
        Ok(RawReadings {
            capacity: self.read_capacity()?,
            current:  self.read_current()?,
            voltage:  self.read_voltage()?,
            rated:    self.read_rated()?,
            health:   self.read_health()?,
            status:   self.read_status()?,
        })
    }
}

impl<S: BatterySource + ?Sized> BatterySource for Box<S> {
    fn read_capacity(&mut self) -> Result<f64> {
        (**self).read_capacity()
    }
    fn read_current(&mut self) -> Result<f64> {
        (**self).read_current()
    }
    fn read_voltage(&mut self) -> Result<f64> {
        (**self).read_voltage()
    }
    fn read_rated(&mut self) -> Result<f64> {
        (**self).read_rated()
    }
    fn read_health(&mut self) -> Result<String> {
        (**self).read_health()
    }
    fn read_status(&mut self) -> Result<String> {
        (**self).read_status()
    }
}

/// Battery read from a sysfs power-supply directory.
#[derive(Debug, Clone)]
pub struct SysfsBattery {
    base: PathBuf,
}

impl SysfsBattery {
    /// Use a specific power-supply directory.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Find the first known battery under `root`.
    pub fn discover_in(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        KNOWN_BATTERIES
            .iter()
            .map(|name| root.join(name))
            .find(|base| base.exists())
            .map(Self::new)
            .ok_or_else(|| {
                PowertrackError::NoBattery(format!(
                    "none of {} present under '{}'",
                    KNOWN_BATTERIES.join(", "),
                    root.display()
                ))
            })
    }

    /// Find the first known battery under `/sys/class/power_supply`.
    pub fn discover() -> Result<Self> {
        Self::discover_in(POWER_SUPPLY_ROOT)
    }

    /// Open `configured` if given, otherwise auto-detect.
    pub fn open(configured: Option<&str>) -> Result<Self> {
        match configured {
            Some(path) => {
                let base = PathBuf::from(path);
                if !base.is_dir() {
                    return Err(PowertrackError::NoBattery(format!(
                        "configured battery path '{}' is not a directory",
                        base.display()
                    )));
                }
                Ok(Self::new(base))
            }
            None => Self::discover(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn read_text(&self, sensor: &'static str, file: &str) -> Result<String> {
        let path = self.base.join(file);
        std::fs::read_to_string(&path)
            .map_err(|source| PowertrackError::SensorUnavailable { sensor, path, source })
    }

    fn read_number(&self, sensor: &'static str, file: &str) -> Result<f64> {
        let raw = self.read_text(sensor, file)?;
        raw.trim()
            .parse::<f64>()
            .map_err(|_| PowertrackError::SensorParse { sensor, value: raw.trim().to_string() })
    }
}

impl BatterySource for SysfsBattery {
    fn read_capacity(&mut self) -> Result<f64> {
        self.read_number("capacity", "capacity")
    }

    fn read_current(&mut self) -> Result<f64> {
        self.read_number("current", "current_now")
    }

    fn read_voltage(&mut self) -> Result<f64> {
        self.read_number("voltage", "voltage_now")
    }

    fn read_rated(&mut self) -> Result<f64> {
        // Some fuel gauges only expose charge, not energy.
        match self.read_number("rated", "energy_full_design") {
            Err(PowertrackError::SensorUnavailable { .. }) => {
                self.read_number("rated", "charge_full_design")
            }
            other => other,
        }
    }

    fn read_health(&mut self) -> Result<String> {
        self.read_text("health", "health")
    }

    fn read_status(&mut self) -> Result<String> {
        self.read_text("status", "status")
    }
}
