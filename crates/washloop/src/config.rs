use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// Configuration for a demo run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// How long to run before stopping the loop, in milliseconds
    #[serde(default = "default_run_ms")]
    pub run_ms: u64,

    /// Loop configuration
    #[serde(default, rename = "loop")]
    pub washloop: LoopConfig,

    /// Simulated motion feed
    #[serde(default)]
    pub feed: FeedConfig,

    /// Gain filter settings
    #[serde(default)]
    pub filter: FilterConfig,

    /// Position reporting
    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run_ms: default_run_ms(),
            washloop: LoopConfig::default(),
            feed: FeedConfig::default(),
            filter: FilterConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Tick interval in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// How often a new motion sample is published, in milliseconds
    #[serde(default = "default_feed_period_ms")]
    pub period_ms: u64,

    /// Peak acceleration (m/s^2) and angular velocity (rad/s)
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,

    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            period_ms: default_feed_period_ms(),
            amplitude: default_amplitude(),
            frequency_hz: default_frequency_hz(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_gain")]
    pub gain: f64,

    /// Symmetric bound applied to every output axis
    #[serde(default = "default_limit")]
    pub limit: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            gain: default_gain(),
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// How often the current position is logged, in milliseconds
    #[serde(default = "default_report_period_ms")]
    pub period_ms: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            period_ms: default_report_period_ms(),
        }
    }
}

fn default_run_ms() -> u64 {
    2_000
}

fn default_interval_ms() -> u64 {
    10
}

fn default_feed_period_ms() -> u64 {
    5
}

fn default_amplitude() -> f64 {
    1.0
}

fn default_frequency_hz() -> f64 {
    0.5
}

fn default_gain() -> f64 {
    0.1
}

fn default_limit() -> f64 {
    0.5
}

fn default_report_period_ms() -> u64 {
    250
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content).or_else(|_| Self::from_json(&content)),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse config as JSON")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.washloop.interval_ms == 0 {
            anyhow::bail!("loop.interval_ms must be at least 1");
        }
        if self.feed.period_ms == 0 {
            anyhow::bail!("feed.period_ms must be at least 1");
        }
        if self.report.period_ms == 0 {
            anyhow::bail!("report.period_ms must be at least 1");
        }
        if !self.feed.amplitude.is_finite() || self.feed.amplitude < 0.0 {
            anyhow::bail!("feed.amplitude must be a finite, non-negative number");
        }
        if !self.feed.frequency_hz.is_finite() || self.feed.frequency_hz < 0.0 {
            anyhow::bail!("feed.frequency_hz must be a finite, non-negative number");
        }
        if !self.filter.gain.is_finite() {
            anyhow::bail!("filter.gain must be finite");
        }
        if !self.filter.limit.is_finite() || self.filter.limit <= 0.0 {
            anyhow::bail!("filter.limit must be a finite, positive number");
        }

        Ok(())
    }

    pub fn run_time(&self) -> Duration {
        Duration::from_millis(self.run_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.washloop.interval_ms)
    }

    pub fn feed_period(&self) -> Duration {
        Duration::from_millis(self.feed.period_ms)
    }

    pub fn report_period(&self) -> Duration {
        Duration::from_millis(self.report.period_ms)
    }
}
