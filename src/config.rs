//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before a race is prepared.

use std::env;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_ARRAY_SIZE, DEFAULT_LOG_FILTER, DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE,
    DEFAULT_NANOS_PER_OP, DEFAULT_POLL_INTERVAL_MS, DEFAULT_PROGRESS_CAP_PERCENT,
};
use crate::models::RaceMode;

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub log: LogConfig,
    pub input: InputConfig,
    pub race: RaceConfig,
    pub progress: ProgressConfig,
    pub report: ReportConfig,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub rust_log: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

/// Input array generation
#[derive(Debug, Clone)]
pub struct InputConfig {
    pub array_size: usize,
    pub min_value: i64,
    pub max_value: i64,
}

/// Which race to run
#[derive(Debug, Clone)]
pub struct RaceConfig {
    pub mode: RaceMode,
    /// Search target; the front end picks one from the array when unset
    pub target: Option<i64>,
}

/// Progress estimator tuning
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    pub poll_interval: Duration,
    pub cap_percent: f64,
    pub nanos_per_op: f64,
}

/// Final report output
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            log: LogConfig::from_source(&lookup)?,
            input: InputConfig::from_source(&lookup)?,
            race: RaceConfig::from_source(&lookup)?,
            progress: ProgressConfig::from_source(&lookup)?,
            report: ReportConfig::from_source(&lookup)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.input.min_value > self.input.max_value {
            return Err(ConfigError::InvalidValue("RACE_MIN_VALUE".to_string()));
        }
        if self.progress.poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue("PROGRESS_POLL_INTERVAL_MS".to_string()));
        }
        if !(0.0..=100.0).contains(&self.progress.cap_percent) {
            return Err(ConfigError::InvalidValue("PROGRESS_CAP_PERCENT".to_string()));
        }
        if !self.progress.nanos_per_op.is_finite() || self.progress.nanos_per_op <= 0.0 {
            return Err(ConfigError::InvalidValue("PROGRESS_NANOS_PER_OP".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogConfig {
                rust_log: DEFAULT_LOG_FILTER.to_string(),
                json: false,
            },
            input: InputConfig {
                array_size: DEFAULT_ARRAY_SIZE,
                min_value: DEFAULT_MIN_VALUE,
                max_value: DEFAULT_MAX_VALUE,
            },
            race: RaceConfig {
                mode: RaceMode::SortAll,
                target: None,
            },
            progress: ProgressConfig::default(),
            report: ReportConfig { json: false },
        }
    }
}

impl LogConfig {
    fn from_source(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let json = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(_) => return Err(ConfigError::InvalidValue("LOG_FORMAT".to_string())),
        };

        Ok(Self {
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            json,
        })
    }
}

impl InputConfig {
    fn from_source(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            array_size: parse_or(lookup, "RACE_ARRAY_SIZE", DEFAULT_ARRAY_SIZE)?,
            min_value: parse_or(lookup, "RACE_MIN_VALUE", DEFAULT_MIN_VALUE)?,
            max_value: parse_or(lookup, "RACE_MAX_VALUE", DEFAULT_MAX_VALUE)?,
        })
    }
}

impl RaceConfig {
    fn from_source(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mode = match lookup("RACE_MODE") {
            Some(value) => RaceMode::from_config_str(&value)
                .ok_or_else(|| ConfigError::InvalidValue("RACE_MODE".to_string()))?,
            None => RaceMode::SortAll,
        };
        let target = lookup("RACE_TARGET")
            .map(|value| {
                value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("RACE_TARGET".to_string()))
            })
            .transpose()?;

        Ok(Self { mode, target })
    }
}

impl ProgressConfig {
    fn from_source(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            poll_interval: Duration::from_millis(parse_or(
                lookup,
                "PROGRESS_POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            )?),
            cap_percent: parse_or(lookup, "PROGRESS_CAP_PERCENT", DEFAULT_PROGRESS_CAP_PERCENT)?,
            nanos_per_op: parse_or(lookup, "PROGRESS_NANOS_PER_OP", DEFAULT_NANOS_PER_OP)?,
        })
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            cap_percent: DEFAULT_PROGRESS_CAP_PERCENT,
            nanos_per_op: DEFAULT_NANOS_PER_OP,
        }
    }
}

impl ReportConfig {
    fn from_source(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let json = match lookup("REPORT_JSON").as_deref() {
            None => false,
            Some("1" | "true" | "yes") => true,
            Some("0" | "false" | "no") => false,
            Some(_) => return Err(ConfigError::InvalidValue("REPORT_JSON".to_string())),
        };
        Ok(Self { json })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = load(&[]).unwrap();
        assert_eq!(config.input.array_size, 10_000);
        assert_eq!(config.input.min_value, 1);
        assert_eq!(config.input.max_value, 100_000);
        assert_eq!(config.race.mode, RaceMode::SortAll);
        assert_eq!(config.race.target, None);
        assert_eq!(config.progress.poll_interval, Duration::from_millis(50));
        assert_eq!(config.log.rust_log, "algorace=info");
        assert!(!config.log.json);
        assert!(!config.report.json);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("RACE_ARRAY_SIZE", "500"),
            ("RACE_MODE", "search"),
            ("RACE_TARGET", "42"),
            ("LOG_FORMAT", "json"),
            ("REPORT_JSON", "true"),
            ("PROGRESS_POLL_INTERVAL_MS", "10"),
        ])
        .unwrap();
        assert_eq!(config.input.array_size, 500);
        assert_eq!(config.race.mode, RaceMode::SearchAll);
        assert_eq!(config.race.target, Some(42));
        assert!(config.log.json);
        assert!(config.report.json);
        assert_eq!(config.progress.poll_interval, Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("RACE_ARRAY_SIZE", "lots")]),
            Err(ConfigError::InvalidValue(key)) if key == "RACE_ARRAY_SIZE"
        ));
        assert!(matches!(
            load(&[("RACE_MODE", "shuffle")]),
            Err(ConfigError::InvalidValue(key)) if key == "RACE_MODE"
        ));
        assert!(matches!(
            load(&[("RACE_MIN_VALUE", "10"), ("RACE_MAX_VALUE", "5")]),
            Err(ConfigError::InvalidValue(key)) if key == "RACE_MIN_VALUE"
        ));
        assert!(matches!(
            load(&[("PROGRESS_POLL_INTERVAL_MS", "0")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("PROGRESS_CAP_PERCENT", "120")]),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
