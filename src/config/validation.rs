//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that redaction patterns compile
//! - Validate value ranges (output target, log level)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TraceConfig → Result<(), Vec<ValidationError>>

use regex::Regex;
use thiserror::Error;

use crate::config::schema::TraceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("trace output must not be empty")]
    EmptyOutput,

    #[error("redaction rule {index} has an empty pattern")]
    EmptyPattern { index: usize },

    #[error("redaction rule {index} is not a valid regex: {reason}")]
    InvalidPattern { index: usize, reason: String },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

pub fn validate_config(config: &TraceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.trace.enabled && config.trace.output.trim().is_empty() {
        errors.push(ValidationError::EmptyOutput);
    }

    for (index, rule) in config.redaction.rules.iter().enumerate() {
        if rule.pattern.is_empty() {
            errors.push(ValidationError::EmptyPattern { index });
            continue;
        }
        if let Err(e) = Regex::new(&rule.pattern) {
            errors.push(ValidationError::InvalidPattern {
                index,
                reason: e.to_string(),
            });
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RedactionRuleConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&TraceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = TraceConfig::default();
        config.trace.enabled = true;
        config.trace.output = "  ".into();
        config.redaction.rules = vec![
            RedactionRuleConfig { pattern: String::new(), replacement: None },
            RedactionRuleConfig { pattern: "(unclosed".into(), replacement: None },
            RedactionRuleConfig { pattern: "ok=\\w+".into(), replacement: None },
        ];
        config.observability.log_level = "verbose".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], ValidationError::EmptyOutput);
        assert_eq!(errors[1], ValidationError::EmptyPattern { index: 0 });
        assert!(matches!(errors[2], ValidationError::InvalidPattern { index: 1, .. }));
        assert_eq!(errors[3], ValidationError::UnknownLogLevel("verbose".into()));
    }

    #[test]
    fn test_empty_output_ignored_when_disabled() {
        let mut config = TraceConfig::default();
        config.trace.output = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = TraceConfig::default();
        config.observability.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
