use chrono::Utc;

/// Current wall-clock time as fractional seconds since the Unix epoch.
///
/// All buffer timestamps and relative offsets are expressed in this unit.
pub fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
