//! Logging setup for the binary.
//!
//! `RUST_LOG`, when set, takes precedence over the configured level.

use crate::config::CalculatorConfig;
use crate::error::{CalcError, Result};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter from `RUST_LOG` or the configured level.
pub fn filter(config: &CalculatorConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|e| {
        CalcError::Config(format!("invalid log level '{}': {e}", config.log_level))
    })
}

/// Install the global subscriber: a log file when configured, else stderr.
pub fn init(config: &CalculatorConfig) -> Result<()> {
    let filter = filter(config)?;

    let file_layer = match &config.log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = if file_layer.is_none() {
        Some(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| CalcError::Config(format!("failed to initialise logging: {e}")))
}
