//! Calculator configuration, read once from the environment at startup.

use crate::error::{CalcError, Result};
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_HISTORY_FILE: &str = "CALCULATOR_HISTORY_FILE";
pub const ENV_HISTORY_DIR: &str = "CALCULATOR_HISTORY_DIR";
pub const ENV_MAX_HISTORY_SIZE: &str = "CALCULATOR_MAX_HISTORY_SIZE";
pub const ENV_MAX_INPUT_VALUE: &str = "CALCULATOR_MAX_INPUT_VALUE";
pub const ENV_PRECISION: &str = "CALCULATOR_PRECISION";
pub const ENV_AUTO_SAVE: &str = "CALCULATOR_AUTO_SAVE";
pub const ENV_LOG_FILE: &str = "CALCULATOR_LOG_FILE";
pub const ENV_LOG_LEVEL: &str = "CALCULATOR_LOG_LEVEL";

/// Largest number of decimal places shown.
pub const MAX_PRECISION: usize = 15;

const DEFAULT_HISTORY_DIR: &str = "history";
const DEFAULT_HISTORY_FILE_NAME: &str = "calc_history.csv";

/// Calculator configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculatorConfig {
    /// CSV file used by `save`, `load` and auto-save.
    pub history_file: PathBuf,

    /// Maximum number of calculations kept in memory.
    pub max_history_size: usize,

    /// Largest accepted operand magnitude.
    pub max_input_value: f64,

    /// Decimal places used when displaying results.
    pub precision: usize,

    /// Save history after every change.
    pub auto_save: bool,

    /// Log destination; `None` logs to stderr.
    pub log_file: Option<PathBuf>,

    /// `tracing` filter directive (e.g. `warn`, `reckon=debug`).
    pub log_level: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from(DEFAULT_HISTORY_DIR).join(DEFAULT_HISTORY_FILE_NAME),
            max_history_size: 100,
            max_input_value: 1e9,
            precision: 4,
            auto_save: true,
            log_file: None,
            log_level: "warn".to_string(),
        }
    }
}

impl CalculatorConfig {
    /// Build from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let history_file = match (get(ENV_HISTORY_FILE), get(ENV_HISTORY_DIR)) {
            (Some(file), _) => PathBuf::from(file),
            (None, Some(dir)) => PathBuf::from(dir).join(DEFAULT_HISTORY_FILE_NAME),
            (None, None) => defaults.history_file,
        };

        let config = Self {
            history_file,
            max_history_size: parse_or(
                ENV_MAX_HISTORY_SIZE,
                get(ENV_MAX_HISTORY_SIZE),
                defaults.max_history_size,
            )?,
            max_input_value: parse_or(
                ENV_MAX_INPUT_VALUE,
                get(ENV_MAX_INPUT_VALUE),
                defaults.max_input_value,
            )?,
            precision: parse_or(
                ENV_PRECISION,
                get(ENV_PRECISION),
                defaults.precision,
            )?,
            auto_save: match get(ENV_AUTO_SAVE) {
                Some(v) => parse_bool(ENV_AUTO_SAVE, &v)?,
                None => defaults.auto_save,
            },
            log_file: get(ENV_LOG_FILE).map(PathBuf::from),
            log_level: get(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_history_size == 0 {
            return Err(CalcError::Config(format!(
                "{ENV_MAX_HISTORY_SIZE} must be at least 1"
            )));
        }
        if !self.max_input_value.is_finite() || self.max_input_value <= 0.0 {
            return Err(CalcError::Config(format!(
                "{ENV_MAX_INPUT_VALUE} must be a positive finite number, got {}",
                self.max_input_value
            )));
        }
        if self.precision > MAX_PRECISION {
            return Err(CalcError::Config(format!(
                "{ENV_PRECISION} must be at most {MAX_PRECISION}, got {}",
                self.precision
            )));
        }
        if self.history_file.as_os_str().is_empty() {
            return Err(CalcError::Config("history file path is empty".into()));
        }
        Ok(())
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            CalcError::Config(format!(
                "invalid value for {key}: '{raw}' (expected {})",
                std::any::type_name::<T>()
            ))
        }),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(CalcError::Config(format!(
            "invalid value for {key}: '{raw}' (expected true/false)"
        ))),
    }
}
