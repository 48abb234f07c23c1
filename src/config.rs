//! Configuration Module
//!
//! TOML configuration for the pipeline, logging and report output, discovered
//! in order of precedence:
//!
//! 1. `$PRODCON_CONFIG`
//! 2. `<config dir>/prodcon/config.toml`
//! 3. `~/.prodcon.toml`
//! 4. `./.prodcon.toml`
//!
//! ```toml
//! [pipeline]
//! capacity = 5
//! item-count = 20
//! strategy = "condition-gated"
//! production-delay-ms = 100
//! consumption-delay-ms = 150
//!
//! [logging]
//! console-level = "info"
//! format = "text"
//!
//! [report]
//! format = "json"
//! file = "results/producer_consumer_results.jsonl"
//! ```

use anyhow::{Context, Result};
use log::{debug, info, LevelFilter};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PipelineError, PipelineResult};
use crate::logging::{self, LogConfig, LogDestination, LogFormat};
use crate::output::ReportFormat;
use crate::pipeline::TaskDelays;
use crate::queue::QueueStrategy;

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
    pub report: ReportConfig,
}

/// Pipeline parameters as written in configuration.
///
/// Counts are signed so that an invalid negative value is reported as a
/// configuration error rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PipelineConfig {
    pub capacity: i64,
    pub item_count: i64,
    pub strategy: QueueStrategy,
    pub production_delay_ms: u64,
    pub consumption_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            item_count: 20,
            strategy: QueueStrategy::default(),
            production_delay_ms: 0,
            consumption_delay_ms: 0,
        }
    }
}

/// Validated pipeline parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub capacity: usize,
    pub item_count: usize,
    pub strategy: QueueStrategy,
    pub delays: TaskDelays,
}

impl PipelineConfig {
    /// Demonstration pacing: 100 ms per produced item, 150 ms per consumed item
    pub fn demo() -> Self {
        Self {
            production_delay_ms: 100,
            consumption_delay_ms: 150,
            ..Self::default()
        }
    }

    /// Check bounds and convert to unsigned settings
    pub fn validate(&self) -> PipelineResult<PipelineSettings> {
        if self.capacity <= 0 {
            return Err(PipelineError::configuration(format!(
                "Queue capacity must be greater than 0 (got {})",
                self.capacity
            )));
        }
        if self.item_count < 0 {
            return Err(PipelineError::configuration(format!(
                "Item count must be non-negative (got {})",
                self.item_count
            )));
        }

        let capacity = usize::try_from(self.capacity)
            .map_err(|_| PipelineError::configuration(format!("Queue capacity {} is too large", self.capacity)))?;
        let item_count = usize::try_from(self.item_count)
            .map_err(|_| PipelineError::configuration(format!("Item count {} is too large", self.item_count)))?;

        Ok(PipelineSettings {
            capacity,
            item_count,
            strategy: self.strategy,
            delays: TaskDelays::new(
                Duration::from_millis(self.production_delay_ms),
                Duration::from_millis(self.consumption_delay_ms),
            ),
        })
    }
}

/// Logging section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    pub console_level: String,
    pub file_level: Option<String>,
    pub format: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: "info".to_string(),
            file_level: None,
            format: "text".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Convert to a logger configuration
    pub fn to_log_config(&self) -> Result<LogConfig> {
        let console_level = logging::parse_log_level(&self.console_level)?;
        let format: LogFormat = self.format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

        let (file_level, destination) = match &self.file {
            Some(path) => {
                let level = match &self.file_level {
                    Some(level) => logging::parse_log_level(level)?,
                    None => LevelFilter::Debug,
                };
                (Some(level), LogDestination::Both(path.clone()))
            }
            None => (None, LogDestination::Console),
        };

        Ok(LogConfig {
            console_level,
            file_level,
            format,
            destination,
        })
    }
}

/// Report output section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration using the discovery hierarchy
    pub fn load() -> Result<Self> {
        debug!("Starting configuration discovery");

        for path in discover_config_files() {
            debug!("Attempting to load config from: {}", path.display());
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(&path);
            }
        }

        info!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from an explicit file path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML content")?;
        debug!("Parsed configuration: {:?}", config);
        Ok(config)
    }
}

/// Discover configuration files in order of precedence
fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = env::var("PRODCON_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("prodcon").join("config.toml"));
    }
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".prodcon.toml"));
    }
    paths.push(PathBuf::from("./.prodcon.toml"));

    debug!("Config discovery paths: {:?}", paths);
    paths
}
