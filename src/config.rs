//! ==============================================================================
//! config.rs - Runtime Configuration Loader
//! ==============================================================================
//!
//! purpose:
//!     defines the schema for `sensor-to-text.toml`.
//!     loads configuration from file. there is no built-in fallback: the
//!     sensor and display credentials have no sensible default, so a missing
//!     or incomplete file stops the process before either loop starts.
//!
//! structure:
//!     - LoggingConfig: log level and whether to dump every parsed line.
//!     - SensorConfig: where the metadata stream lives and how to reach it.
//!     - DisplayConfig: where notifications go and how they look.
//!     - RotationConfig: per-item, between-cycle and no-data timings.
//!     - MetricsConfig: one enable flag (and optional label) per metric.
//!
//! ==============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use serde::Deserialize;

use crate::domain::Metric;
use crate::error::ConfigError;
use crate::ingest::DEFAULT_MAX_LINE_BYTES;

pub const DEFAULT_CONFIG_PATH: &str = "config/sensor-to-text.toml";

/// Root configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    pub sensor: SensorConfig,
    pub display: DisplayConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub show_sensor_data: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_sensor_path")]
    pub path: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_text_size")]
    pub text_size: String,
    #[serde(default = "default_scroll_direction")]
    pub scroll_direction: String,
    #[serde(default)]
    pub scroll_speed: u32,
    #[serde(default)]
    pub duration_unit: DurationUnit,
}

/// Unit of the `duration.value` field the display expects.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Seconds,
    Milliseconds,
}

impl DurationUnit {
    pub fn encode(self, duration: Duration) -> u64 {
        match self {
            DurationUnit::Seconds => duration.as_secs(),
            DurationUnit::Milliseconds => duration.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RotationConfig {
    #[serde(default = "default_seconds_between_cycles")]
    pub seconds_between_cycles: u64,
    #[serde(default = "default_seconds_per_data")]
    pub seconds_per_data: u64,
    #[serde(default = "default_no_data_retry")]
    pub no_data_retry_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MetricEntry {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub label: Option<String>,
}

/// Metrics missing from the file are disabled.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MetricsConfig {
    #[serde(default)]
    pub temperature: MetricEntry,
    #[serde(default)]
    pub humidity: MetricEntry,
    #[serde(default)]
    pub co2: MetricEntry,
    #[serde(default)]
    pub nox: MetricEntry,
    #[serde(default)]
    pub pm1_0: MetricEntry,
    #[serde(default)]
    pub pm2_5: MetricEntry,
    #[serde(default)]
    pub pm4_0: MetricEntry,
    #[serde(default)]
    pub pm10_0: MetricEntry,
    #[serde(default)]
    pub vaping: MetricEntry,
    #[serde(default)]
    pub voc: MetricEntry,
    #[serde(default)]
    pub aqi: MetricEntry,
}

impl MetricsConfig {
    pub fn entry(&self, metric: Metric) -> &MetricEntry {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Humidity => &self.humidity,
            Metric::Co2 => &self.co2,
            Metric::Nox => &self.nox,
            Metric::Pm1_0 => &self.pm1_0,
            Metric::Pm2_5 => &self.pm2_5,
            Metric::Pm4_0 => &self.pm4_0,
            Metric::Pm10_0 => &self.pm10_0,
            Metric::Vaping => &self.vaping,
            Metric::Voc => &self.voc,
            Metric::Aqi => &self.aqi,
        }
    }

    pub fn enabled(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::ALL
            .into_iter()
            .filter(move |m| self.entry(*m).enabled)
    }
}

impl SensorConfig {
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.path)
    }
}

impl DisplayConfig {
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: PathBuf::from(path),
            source,
        })?;

        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from(path),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Log configuration summary. Passwords are never logged.
    pub fn log_summary(&self) {
        let enabled: Vec<String> = self.metrics.enabled().map(|m| m.to_string()).collect();
        info!("sensor:  {} (user '{}')", self.sensor.url(), self.sensor.user);
        info!(
            "display: {} (user '{}')",
            self.display.base_url(),
            self.display.user
        );
        info!(
            "rotation: {}s per item, {}s between cycles, {}s retry without data",
            self.rotation.seconds_per_data,
            self.rotation.seconds_between_cycles,
            self.rotation.no_data_retry_seconds
        );
        if enabled.is_empty() {
            info!("metrics: none enabled, the display will only be cleared");
        } else {
            info!("metrics: {}", enabled.join(", "));
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            show_sensor_data: false,
        }
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            seconds_between_cycles: default_seconds_between_cycles(),
            seconds_per_data: default_seconds_per_data(),
            no_data_retry_seconds: default_no_data_retry(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_sensor_path() -> String {
    "/axis-cgi/airquality/metadata.cgi".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_max_line_bytes() -> usize {
    DEFAULT_MAX_LINE_BYTES
}

fn default_text_color() -> String {
    "#FFFFFF".to_string()
}

fn default_text_size() -> String {
    "medium".to_string()
}

fn default_scroll_direction() -> String {
    "fromRightToLeft".to_string()
}

fn default_seconds_between_cycles() -> u64 {
    30
}

fn default_seconds_per_data() -> u64 {
    5
}

fn default_no_data_retry() -> u64 {
    5
}
