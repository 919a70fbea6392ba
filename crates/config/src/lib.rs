pub mod schema;
pub mod watcher;

pub use schema::{
    AxisConfig, GlobalConfig, GraphConfig, GraphsConfig, OutputFormat, PowertrackConfig,
    TrackersConfig,
};
pub use watcher::ConfigWatcher;

use powertrack_core::{PowertrackError, Result};
use std::path::{Path, PathBuf};

/// Load and validate configuration from a TOML file.
///
/// A missing file is not an error: powertrack then runs on the built-in
/// tracker windows (1 Hz power, 2 min capacity) and sysfs auto-detection.
/// A file that exists but fails to parse or validate is rejected.
pub fn load(path: impl AsRef<Path>) -> Result<PowertrackConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(PowertrackConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| PowertrackError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse and validate configuration from TOML text.
pub fn parse(raw: &str) -> Result<PowertrackConfig> {
    let config: PowertrackConfig =
        toml::from_str(raw).map_err(|e| PowertrackError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// `$XDG_CONFIG_HOME/powertrack/powertrack.toml`, falling back to
/// `$HOME/.config` and finally the working directory.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("powertrack").join("powertrack.toml")
}
