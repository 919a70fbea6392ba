//! powertrack — battery consumption and depletion tracker.
//!
//! Run with:  `RUST_LOG=info powertrack [--mock] [--json] [--config <path>]`

mod display;

use anyhow::Result;
use clap::Parser;
use display::Display;
use powertrack_config::{default_path, load as load_config, ConfigWatcher, OutputFormat, PowertrackConfig};
use powertrack_core::AppState;
use powertrack_system::{spawn_monitor, BatterySource, BatteryTracker, MockBattery, SysfsBattery};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line flags.  Flags override the config file.
#[derive(Debug, Parser)]
#[command(name = "powertrack")]
#[command(about = "Battery consumption and depletion tracker")]
#[command(version)]
struct Args {
    /// Use a synthetic battery instead of sysfs
    #[arg(long)]
    mock: bool,

    /// Print one JSON object per update
    #[arg(long)]
    json: bool,

    /// Config file (default: $XDG_CONFIG_HOME/powertrack/powertrack.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut PowertrackConfig) {
        if self.mock {
            config.global.mock = true;
        }
        if self.json {
            config.global.output = OutputFormat::Json;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable in JSON mode.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("powertrack v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = args.config.clone().unwrap_or_else(default_path);
    let mut config = load_config(&config_path)?;
    args.apply(&mut config);

    let source: Box<dyn BatterySource> = if config.global.mock {
        info!("Using synthetic battery");
        Box::new(MockBattery::new())
    } else {
        let battery = SysfsBattery::open(config.global.battery_path.as_deref())?;
        info!("Reading battery at {}", battery.base().display());
        Box::new(battery)
    };

    let trackers = &config.trackers;
    let tracker = BatteryTracker::new(source, trackers.power, trackers.expected_time, trackers.capacity);
    let mut updates = spawn_monitor(tracker, Duration::from_millis(config.global.poll_interval_ms));
    let (_watcher, mut reloads) = ConfigWatcher::spawn(&config_path);

    let mut display = Display::new(config.global.output, config.graphs.clone());
    let mut state = AppState::default();
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            message = updates.recv() => {
                let Some(message) = message else {
                    warn!("Battery monitor stopped");
                    break;
                };
                state.apply(message);
                display.render(&state, &mut stdout)?;
            }
            Some(mut reloaded) = reloads.recv() => {
                args.apply(&mut reloaded);
                if reloaded.trackers != config.trackers
                    || reloaded.global.poll_interval_ms != config.global.poll_interval_ms
                {
                    warn!("Tracker and polling changes take effect on restart");
                }
                display.reconfigure(&reloaded);
                let output = display.output();
                info!("Config reloaded ({output:?} output)");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down after {} polls ({} failed)", state.polls, state.failures);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("powertrack").chain(args.iter().copied()))
    }

    #[test]
    fn parses_flags() {
        let args = parse(&["--mock", "--config", "/tmp/p.toml", "--json"]).expect("valid");
        assert!(args.mock && args.json);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/p.toml")));
    }

    #[test]
    fn rejects_unknown_and_dangling() {
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["--config"]).is_err());
    }

    #[test]
    fn flags_override_config() {
        let mut cfg = PowertrackConfig::default();
        parse(&["--json", "--mock"]).expect("valid").apply(&mut cfg);
        assert!(cfg.global.mock);
        assert_eq!(cfg.global.output, OutputFormat::Json);
    }

    #[test]
    fn args_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
