use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub canvas: CanvasConfig,
    pub topology: TopologyConfig,
    pub timeline: TimelineConfig,
    pub summary: SummaryConfig,
    pub legend: LegendConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:8000/websocket".to_string(),
            canvas: CanvasConfig::default(),
            topology: TopologyConfig::default(),
            timeline: TimelineConfig::default(),
            summary: SummaryConfig::default(),
            legend: LegendConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    /// Share of the height given to the topology, the rest holds the chart
    pub topology_share: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 600.0,
            topology_share: 0.7,
        }
    }
}

impl CanvasConfig {
    pub fn topology_height(&self) -> f64 {
        self.height * self.topology_share
    }

    pub fn timeline_height(&self) -> f64 {
        self.height * (1.0 - self.topology_share)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TopologyConfig {
    /// Used when `link.length == 0`
    pub link_length: f64,
    /// Multiplier for `link.length > 0`
    pub link_factor: f64,
    pub default_charge: f64,
    /// Charge per display class
    pub charges: HashMap<String, f64>,
    pub gravity: f64,
    /// Screen position of pinned nodes, defaults to `(width / 3, 50)`
    pub pinned_position: Option<(f64, f64)>,
    pub layout_tick_ms: u64,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            link_length: 15.0,
            link_factor: 100.0,
            default_charge: -50.0,
            charges: HashMap::from([
                ("pqbus".to_string(), -100.0),
                ("refbus".to_string(), -75.0),
            ]),
            gravity: 0.12,
            pinned_position: None,
            layout_tick_ms: 16,
        }
    }
}

impl TopologyConfig {
    pub fn charge_for(&self, display_class: &str) -> f64 {
        self.charges
            .iter()
            .find(|(class, _)| class.eq_ignore_ascii_case(display_class))
            .map(|(_, charge)| *charge)
            .unwrap_or(self.default_charge)
    }

    pub fn link_distance(&self, length: f64) -> f64 {
        if length > 0.0 {
            length * self.link_factor
        } else {
            self.link_length
        }
    }

    pub fn layout_period(&self) -> Duration {
        Duration::from_millis(self.layout_tick_ms.max(1))
    }
}

/// Upper bound on chart history per entity
pub const MAX_BACKLOG: usize = 100_000;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimelineConfig {
    /// Chart samples per hour of `timeline_hours`
    pub samples_per_hour: f64,
    pub transition_ms: u64,
    pub y_ticks: usize,
    pub max_time_ticks: usize,
    pub margin: Margin,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            samples_per_hour: 25.0,
            transition_ms: 1000,
            y_ticks: 5,
            max_time_ticks: 10,
            margin: Margin::default(),
        }
    }
}

impl TimelineConfig {
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Samples in the visible window, at most `MAX_BACKLOG`
    pub fn backlog(&self, timeline_hours: f64) -> usize {
        let samples = (timeline_hours * self.samples_per_hour).round();
        if samples.is_nan() || samples <= 0.0 {
            return 0;
        }
        (samples.min(MAX_BACKLOG as f64)) as usize
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 110.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SummaryConfig {
    pub min_interval_ms: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 1000,
        }
    }
}

impl SummaryConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LegendConfig {
    /// Human labels for entity type keys
    pub aliases: HashMap<String, String>,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            aliases: HashMap::from([
                ("PQBus".to_string(), "Service drop".to_string()),
                ("RefBus".to_string(), "Distribution Feeder".to_string()),
            ]),
        }
    }
}

impl LegendConfig {
    pub fn label_for(&self, key: &str) -> String {
        self.aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(key))
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| key.to_string())
    }
}

/// Layered configuration: optional `config/client` file, then `SIMVIZ__*` env vars
pub fn load_client_config() -> anyhow::Result<ClientConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/client").required(false))
        .add_source(
            config::Environment::with_prefix("SIMVIZ")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
