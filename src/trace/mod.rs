//! Trace record formatting and output.
//!
//! # Data Flow
//! ```text
//! transport (request / response parts + buffered body)
//!     → dump.rs (textual HTTP/1.x rendering)
//!     → redact.rs (hide credentials)
//!     → Tracer (labels via catalog.rs, stamps via clock.rs)
//!     → sink.rs (stdout / stderr / file / tracing / memory)
//! ```
//!
//! # Record Formats
//! ```text
//! \n<REQUEST:> [<RFC3339 start>]\n<dump>\n
//! [MULTIPART/FORM-DATA CONTENT HIDDEN]\n            (only when the body was suppressed)
//! \n<RESPONSE:> [<RFC3339 end>] <Elapsed:> <N>ms\n<dump>\n
//! ```

pub mod catalog;
pub mod clock;
pub mod dump;
pub mod redact;
pub mod sink;

use std::sync::Arc;

use crate::config::{ConfigError, Destination, TraceConfig};
use catalog::{
    MessageCatalog, ELAPSED_LABEL, REQUEST_DUMP_FAILED, REQUEST_LABEL, RESPONSE_DUMP_FAILED,
    RESPONSE_LABEL,
};
use clock::{format_millis, Clock, Stamp, SystemClock};
use dump::DumpError;
use redact::{Redact, RedactionRule, Redactor, PRIVATE_DATA_PLACEHOLDER};
use sink::{NullSink, TraceSink, TracingSink, WriterSink};

/// Marker written after a request whose multipart body was not dumped.
pub const MULTIPART_HIDDEN: &str = "[MULTIPART/FORM-DATA CONTENT HIDDEN]";

/// Everything needed to write trace records. Cheap to clone and shared by
/// every transport built from it.
#[derive(Clone)]
pub struct Tracer {
    sink: Arc<dyn TraceSink>,
    redactor: Arc<dyn Redact>,
    catalog: Arc<MessageCatalog>,
    clock: Arc<dyn Clock>,
}

impl Tracer {
    /// Tracer writing to `sink` with the built-in redaction rules,
    /// untranslated messages and the system clock.
    pub fn new(sink: impl TraceSink + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
            redactor: Arc::new(Redactor::builtin()),
            catalog: Arc::new(MessageCatalog::identity()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Tracer that writes nothing; transports built from it only pass traffic through.
    pub fn disabled() -> Self {
        Self::new(NullSink)
    }

    pub fn with_redactor(mut self, redactor: impl Redact + 'static) -> Self {
        self.redactor = Arc::new(redactor);
        self
    }

    pub fn with_catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Build a tracer from validated configuration, opening the output if needed.
    pub fn from_config(config: &TraceConfig) -> Result<Self, ConfigError> {
        let tracer = match config.trace.destination() {
            None => Self::disabled(),
            Some(Destination::Stdout) => Self::new(WriterSink::stdout()),
            Some(Destination::Stderr) => Self::new(WriterSink::stderr()),
            Some(Destination::Log) => Self::new(TracingSink),
            Some(Destination::File(path)) => {
                let sink = WriterSink::append(&path)
                    .map_err(|source| ConfigError::Output { path: path.clone(), source })?;
                tracing::info!(path = %path.display(), "Writing HTTP trace to file");
                Self::new(sink)
            }
        };

        let mut redactor = if config.redaction.builtin {
            Redactor::builtin()
        } else {
            Redactor::none()
        };
        for (index, rule) in config.redaction.rules.iter().enumerate() {
            let replacement = rule
                .replacement
                .clone()
                .unwrap_or_else(|| PRIVATE_DATA_PLACEHOLDER.to_string());
            let rule = RedactionRule::new(&rule.pattern, replacement).map_err(|e| {
                ConfigError::Validation(vec![crate::config::ValidationError::InvalidPattern {
                    index,
                    reason: e.to_string(),
                }])
            })?;
            redactor = redactor.with_rule(rule);
        }

        Ok(tracer
            .with_redactor(redactor)
            .with_catalog(MessageCatalog::from_translations(config.messages.clone())))
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_enabled()
    }

    pub fn now(&self) -> Stamp {
        self.clock.now()
    }

    /// Write the request record, or the localized diagnostic if dumping failed.
    pub fn trace_request(&self, start: &Stamp, dump: Result<String, DumpError>, body_hidden: bool) {
        let dump = match dump {
            Ok(dump) => dump,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to dump HTTP request");
                let error = e.to_string();
                self.sink
                    .write(&self.catalog.translate(REQUEST_DUMP_FAILED, &[("error", error.as_str())]));
                return;
            }
        };

        let mut record = format!(
            "\n{} [{}]\n{}\n",
            self.catalog.translate(REQUEST_LABEL, &[]),
            start.rfc3339(),
            self.redactor.redact(&dump),
        );
        if body_hidden {
            record.push_str(MULTIPART_HIDDEN);
            record.push('\n');
        }
        // One write per record so concurrent round trips never interleave.
        self.sink.write(&record);
    }

    /// Write the response record with elapsed time, or the localized diagnostic.
    pub fn trace_response(&self, start: &Stamp, end: &Stamp, dump: Result<String, DumpError>) {
        let dump = match dump {
            Ok(dump) => dump,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to dump HTTP response");
                let error = e.to_string();
                self.sink
                    .write(&self.catalog.translate(RESPONSE_DUMP_FAILED, &[("error", error.as_str())]));
                return;
            }
        };

        self.sink.write(&format!(
            "\n{} [{}] {} {}\n{}\n",
            self.catalog.translate(RESPONSE_LABEL, &[]),
            end.rfc3339(),
            self.catalog.translate(ELAPSED_LABEL, &[]),
            format_millis(end.since(start)),
            self.redactor.redact(&dump),
        ));
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(TracingSink)
    }
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("enabled", &self.is_enabled())
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}
