//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::TraceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that switches tracing on or off after the file is loaded.
///
/// `true`/`1` writes to stdout, `false`/`0`/empty disables tracing, and any
/// other value is taken as the path of a file to append to.
pub const TRACE_ENV: &str = "TRACE_TRANSPORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("cannot open trace output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then apply [`TRACE_ENV`].
pub fn load_config(path: &Path) -> Result<TraceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: TraceConfig = toml::from_str(&content)?;

    apply_env_override(&mut config, std::env::var(TRACE_ENV).ok().as_deref());
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(path = %path.display(), enabled = config.trace.enabled, "Configuration loaded");
    Ok(config)
}

/// Defaults plus [`TRACE_ENV`], for running without a config file.
pub fn load_default() -> Result<TraceConfig, ConfigError> {
    let mut config = TraceConfig::default();
    apply_env_override(&mut config, std::env::var(TRACE_ENV).ok().as_deref());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply the value of [`TRACE_ENV`], if set.
pub fn apply_env_override(config: &mut TraceConfig, value: Option<&str>) {
    let Some(value) = value else {
        return;
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" => config.trace.enabled = false,
        "true" | "1" => {
            config.trace.enabled = true;
            config.trace.output = "stdout".to_string();
        }
        _ => {
            config.trace.enabled = true;
            config.trace.output = value.trim().to_string();
        }
    }
}
