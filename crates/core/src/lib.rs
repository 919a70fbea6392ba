pub mod clock;
pub mod error;
pub mod event;
pub mod metric;
pub mod series;
pub mod snapshot;
pub mod state;

pub use error::{PowertrackError, Result};
pub use event::Message;
pub use metric::TrackedMetric;
pub use series::{Sample, TimeSeriesBuffer, TrackerConfig};
pub use snapshot::{BatterySnapshot, MeasurementValue, RawReadings, RawValue};
pub use state::{AppState, BatteryUpdate};
