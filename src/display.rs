//! Terminal consumer for battery updates.
//!
//! Prints the label values of each snapshot and a one-line summary per
//! trend graph, or the whole update as a JSON line.

use powertrack_config::{GraphsConfig, OutputFormat, PowertrackConfig};
use powertrack_core::{AppState, BatteryUpdate};
use std::io::{self, Write};

#[derive(Debug, Clone)]
pub struct Display {
    output: OutputFormat,
    graphs: GraphsConfig,
}

impl Display {
    pub fn new(output: OutputFormat, graphs: GraphsConfig) -> Self {
        Self { output, graphs }
    }

    /// Take output format and graph declarations from a reloaded config.
    pub fn reconfigure(&mut self, config: &PowertrackConfig) {
        self.output = config.global.output;
        self.graphs = config.graphs.clone();
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    /// Print the newest state: the latest update, or the last failure.
    pub fn render(&self, state: &AppState, out: &mut impl Write) -> io::Result<()> {
        match (&state.last_error, &state.latest) {
            (Some(reason), _) => self.render_failure(reason, out),
            (None, Some(update)) => self.render_update(update, out),
            (None, None) => Ok(()),
        }
    }

    fn render_failure(&self, reason: &str, out: &mut impl Write) -> io::Result<()> {
        match self.output {
            OutputFormat::Text => writeln!(out, "poll failed: {reason}"),
            OutputFormat::Json => {
                writeln!(out, "{}", serde_json::json!({ "error": reason }))
            }
        }
    }

    fn render_update(&self, update: &BatteryUpdate, out: &mut impl Write) -> io::Result<()> {
        match self.output {
            OutputFormat::Json => {
                let line = serde_json::to_string(update).map_err(io::Error::other)?;
                writeln!(out, "{line}")
            }
            OutputFormat::Text => {
                let labels: Vec<String> = update
                    .snapshot
                    .fields()
                    .iter()
                    .map(|(label, value)| format!("{label}: {value}"))
                    .collect();
                writeln!(out, "{}", labels.join(" | "))?;
                writeln!(out, "  {}", self.power_summary(update))?;
                writeln!(out, "  {}", self.capacity_summary(update))
            }
        }
    }

    fn power_summary(&self, update: &BatteryUpdate) -> String {
        let axis = &self.graphs.power.x;
        let in_view = update.power_history.iter().filter(|(x, _)| axis.contains(*x)).count();
        match update.power_average {
            Some(avg) => format!(
                "{}: {in_view}/{} pts in view, avg {avg:.1}W",
                self.graphs.power.y.label,
                update.power_history.len()
            ),
            None => format!("{}: no samples", self.graphs.power.y.label),
        }
    }

    fn capacity_summary(&self, update: &BatteryUpdate) -> String {
        let graph = &self.graphs.capacity;
        let samples = update.capacity_trend.len() - usize::from(update.capacity_zero_crossing.is_some());
        match update.capacity_zero_crossing {
            Some(x) => {
                let note = if graph.x.contains(x) { "" } else { " (off graph)" };
                format!(
                    "{}: {samples} pts, reaches 0 at {:+.2} on {}{note}",
                    graph.y.label,
                    graph.x.to_label_units(x),
                    graph.x.label
                )
            }
            None => format!("{}: {samples} pts, no trend yet", graph.y.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powertrack_core::{BatterySnapshot, Message, RawReadings};

    fn update() -> BatteryUpdate {
        let raw = RawReadings {
            capacity: 50.0,
            current:  -500_000.0,
            voltage:  4_000_000.0,
            rated:    10_000_000.0,
            health:   "Good\n".into(),
            status:   "Discharging\n".into(),
        };
        BatteryUpdate {
            taken_at: 0.0,
            snapshot: BatterySnapshot::from_readings(&raw, 0.0),
            power_history: vec![(-40.0, -2.0), (-1.0, -2.0), (0.0, -2.0)],
            expected_time_history: vec![(0.0, 2.5)],
            capacity_trend: vec![(-7200.0, 52.0), (0.0, 50.0), (180_000.0, 0.0)],
            capacity_zero_crossing: Some(180_000.0),
            power_average: Some(-2.0),
        }
    }

    fn rendered(display: &Display, state: &AppState) -> String {
        let mut buf = Vec::new();
        display.render(state, &mut buf).expect("write to vec");
        String::from_utf8(buf).expect("utf8")
    }

    fn state_with(message: Message) -> AppState {
        let mut state = AppState::default();
        state.apply(message);
        state
    }

    #[test]
    fn text_lists_labels_and_trends() {
        let display = Display::new(OutputFormat::Text, GraphsConfig::default());
        let text = rendered(&display, &state_with(Message::Battery(Box::new(update()))));

        assert!(text.contains("Capacity: 50.0%"));
        assert!(text.contains("Time at power: 2.5h"));
        assert!(text.contains("Expected time: Estimating..."));
        assert!(text.contains("Status: Discharging |"));
        assert!(text.contains("Power (W): 2/3 pts in view, avg -2.0W"));
        assert!(text.contains("Capacity (%): 2 pts, reaches 0 at +50.00 on Time (h) (off graph)"));
    }

    #[test]
    fn json_is_one_line_per_update() {
        let display = Display::new(OutputFormat::Json, GraphsConfig::default());
        let text = rendered(&display, &state_with(Message::Battery(Box::new(update()))));

        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["snapshot"]["capacity"]["raw_value"], 50.0);
        assert_eq!(value["snapshot"]["expected_time_by_gradient"]["is_valid"], false);
    }

    #[test]
    fn failure_is_reported() {
        let display = Display::new(OutputFormat::Text, GraphsConfig::default());
        let text = rendered(&display, &state_with(Message::SensorFailed("no capacity".into())));
        assert_eq!(text, "poll failed: no capacity\n");
    }

    #[test]
    fn reconfigure_switches_format() {
        let mut display = Display::new(OutputFormat::Text, GraphsConfig::default());
        let mut cfg = PowertrackConfig::default();
        cfg.global.output = OutputFormat::Json;
        display.reconfigure(&cfg);
        assert_eq!(display.output(), OutputFormat::Json);
    }
}
