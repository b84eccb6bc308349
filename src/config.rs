use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Smallest surface that still leaves room inside the widest chart margins
const MIN_CHART_WIDTH: f64 = 240.0;
const MIN_CHART_HEIGHT: f64 = 110.0;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server address (e.g., "0.0.0.0:8080")
    #[serde(default = "default_addr")]
    pub addr: String,
    /// JSON snapshot replacing the built-in sample data
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
    /// Chart surface configuration
    #[serde(default)]
    pub chart: ChartConfig,
    /// Force layout configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChartConfig {
    /// Drawing surface width in pixels
    #[serde(default = "default_chart_width")]
    pub width: f64,
    /// Drawing surface height in pixels
    #[serde(default = "default_chart_height")]
    pub height: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Rest length of link springs
    #[serde(default = "default_link_distance")]
    pub link_distance: f64,
    /// Many-body strength (negative repels)
    #[serde(default = "default_charge_strength")]
    pub charge_strength: f64,
    /// Strength of the x/y forces pulling toward the center
    #[serde(default = "default_position_strength")]
    pub position_strength: f64,
    /// Alpha below which the simulation counts as settled
    #[serde(default = "default_alpha_min")]
    pub alpha_min: f64,
    /// Ticks needed to cool from alpha 1 to alpha_min
    #[serde(default = "default_cooling_ticks")]
    pub cooling_ticks: usize,
    /// Fraction of velocity lost per tick
    #[serde(default = "default_velocity_decay")]
    pub velocity_decay: f64,
    /// Interval between live ticks streamed over WebSocket
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Upper bound of ticks spent on the initial server-side layout
    #[serde(default = "default_max_ticks")]
    pub max_ticks: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            link_distance: default_link_distance(),
            charge_strength: default_charge_strength(),
            position_strength: default_position_strength(),
            alpha_min: default_alpha_min(),
            cooling_ticks: default_cooling_ticks(),
            velocity_decay: default_velocity_decay(),
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: default_max_ticks(),
        }
    }
}

// Default value functions
fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_chart_width() -> f64 {
    900.0
}

fn default_chart_height() -> f64 {
    600.0
}

fn default_link_distance() -> f64 {
    100.0
}

fn default_charge_strength() -> f64 {
    -300.0
}

fn default_position_strength() -> f64 {
    0.1
}

fn default_alpha_min() -> f64 {
    0.001
}

fn default_cooling_ticks() -> usize {
    300
}

fn default_velocity_decay() -> f64 {
    0.4
}

fn default_tick_interval_ms() -> u64 {
    16
}

fn default_max_ticks() -> usize {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            data_file: None,
            log: LogConfig::default(),
            chart: ChartConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the layouts cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        self.chart.validate()?;
        self.simulation.validate()
    }
}

impl ChartConfig {
    fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.width > MIN_CHART_WIDTH && self.height > MIN_CHART_HEIGHT,
            "chart must be larger than {}x{}, got {}x{}",
            MIN_CHART_WIDTH,
            MIN_CHART_HEIGHT,
            self.width,
            self.height
        );
        Ok(())
    }
}

impl SimulationConfig {
    fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.alpha_min > 0.0 && self.alpha_min < 1.0,
            "simulation.alpha_min must be in (0, 1), got {}",
            self.alpha_min
        );
        ensure!(
            (0.0..=1.0).contains(&self.velocity_decay),
            "simulation.velocity_decay must be in [0, 1], got {}",
            self.velocity_decay
        );
        ensure!(self.cooling_ticks > 0, "simulation.cooling_ticks must be positive");
        ensure!(self.max_ticks > 0, "simulation.max_ticks must be positive");
        ensure!(
            self.link_distance.is_finite() && self.charge_strength.is_finite() && self.position_strength.is_finite(),
            "simulation forces must be finite numbers"
        );
        Ok(())
    }
}
