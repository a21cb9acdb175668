//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Operational events (config loaded, dump failures, sink errors)
//!     → tracing macros with structured fields
//!     → logging.rs subscriber (stderr, EnvFilter)
//!
//! HTTP trace records do not pass through here unless the trace output is
//! "log", in which case they are events on the `http_trace` target.
//! ```

pub mod logging;
