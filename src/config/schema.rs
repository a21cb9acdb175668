//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! every field has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration for the tracing transport.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TraceConfig {
    /// Whether and where trace records are written.
    pub trace: OutputConfig,

    /// Redaction policy applied to every dump.
    pub redaction: RedactionConfig,

    /// Translations keyed by the English message template.
    pub messages: HashMap<String, String>,

    /// Operational logging settings.
    pub observability: ObservabilityConfig,
}

/// Trace output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write trace records at all.
    pub enabled: bool,

    /// "stdout", "stderr", "log" (tracing events) or a file path.
    pub output: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output: "stderr".to_string(),
        }
    }
}

/// Where enabled trace records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Stderr,
    Log,
    File(PathBuf),
}

impl OutputConfig {
    /// `None` when tracing is disabled.
    pub fn destination(&self) -> Option<Destination> {
        if !self.enabled {
            return None;
        }
        let dest = match self.output.trim() {
            "stdout" => Destination::Stdout,
            "stderr" => Destination::Stderr,
            "log" => Destination::Log,
            path => Destination::File(PathBuf::from(path)),
        };
        Some(dest)
    }
}

/// Redaction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedactionConfig {
    /// Apply the built-in credential rules.
    pub builtin: bool,

    /// Additional rules, applied after the built-in ones.
    pub rules: Vec<RedactionRuleConfig>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            rules: Vec::new(),
        }
    }
}

/// A user-supplied redaction rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedactionRuleConfig {
    /// Regular expression matched against the dump.
    pub pattern: String,

    /// Replacement text; `$1` style group references are expanded.
    /// Defaults to the private-data placeholder.
    #[serde(default)]
    pub replacement: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TraceConfig::default();
        assert!(!config.trace.enabled);
        assert_eq!(config.trace.output, "stderr");
        assert!(config.redaction.builtin);
        assert!(config.redaction.rules.is_empty());
        assert!(config.messages.is_empty());
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_destination() {
        let mut output = OutputConfig::default();
        assert_eq!(output.destination(), None);

        output.enabled = true;
        assert_eq!(output.destination(), Some(Destination::Stderr));

        output.output = "log".into();
        assert_eq!(output.destination(), Some(Destination::Log));

        output.output = "/var/log/trace.log".into();
        assert_eq!(
            output.destination(),
            Some(Destination::File(PathBuf::from("/var/log/trace.log")))
        );
    }

    #[test]
    fn test_parse_full_document() {
        let doc = r#"
            [trace]
            enabled = true
            output = "stdout"

            [redaction]
            builtin = false

            [[redaction.rules]]
            pattern = "(?i)x-session: [^\\r\\n]*"
            replacement = "X-Session: [PRIVATE DATA HIDDEN]"

            [[redaction.rules]]
            pattern = "card=\\d+"

            [messages]
            "REQUEST:" = "ANFRAGE:"

            [observability]
            log_level = "debug"
        "#;

        let config: TraceConfig = toml::from_str(doc).unwrap();
        assert_eq!(config.trace.destination(), Some(Destination::Stdout));
        assert!(!config.redaction.builtin);
        assert_eq!(config.redaction.rules.len(), 2);
        assert!(config.redaction.rules[1].replacement.is_none());
        assert_eq!(config.messages["REQUEST:"], "ANFRAGE:");
        assert_eq!(config.observability.log_level, "debug");
    }
}
