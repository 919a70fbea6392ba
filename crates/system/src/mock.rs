use crate::battery::BatterySource;
use powertrack_core::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic battery for running without hardware.
///
/// Capacity falls by half a percent per read and the current is drawn
/// uniformly between 0.5 A and 1.0 A, so every graph has something to show.
#[derive(Debug, Clone)]
pub struct MockBattery {
    capacity: f64,
    rng:      StdRng,
}

impl Default for MockBattery {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBattery {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Reproducible current readings for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self { capacity: 100.0, rng }
    }
}

impl BatterySource for MockBattery {
    fn read_capacity(&mut self) -> Result<f64> {
        self.capacity -= 0.5;
        Ok(self.capacity)
    }

    fn read_current(&mut self) -> Result<f64> {
        Ok(self.rng.random_range(500_000..=1_000_000) as f64)
    }

    fn read_voltage(&mut self) -> Result<f64> {
        Ok(3_200_000.0)
    }

    fn read_rated(&mut self) -> Result<f64> {
        Ok(11.4 * 1_000_000.0)
    }

    fn read_health(&mut self) -> Result<String> {
        Ok("Good".to_string())
    }

    fn read_status(&mut self) -> Result<String> {
        Ok("Charging".to_string())
    }
}
