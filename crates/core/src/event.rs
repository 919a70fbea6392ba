use crate::state::BatteryUpdate;

/// Messages sent from the battery monitor task to the display consumer.
#[derive(Debug, Clone)]
pub enum Message {
    /// A fresh snapshot plus the trend series computed alongside it.
    Battery(Box<BatteryUpdate>),
    /// This poll cycle produced no snapshot; carries the reason.
    SensorFailed(String),
}
