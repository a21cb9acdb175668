//! HTTP client trace logging transport.
//!
//! Wraps any request executor so that every outgoing request and its
//! response are written to a diagnostic sink with credentials redacted and
//! the round trip timed.

pub mod config;
pub mod observability;
pub mod trace;
pub mod transport;

use std::sync::Arc;

/// Boxed error used for bodies and executors with heterogeneous error types.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error that must be reported to more than one party.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync>;

pub use config::TraceConfig;
pub use trace::Tracer;
pub use transport::{TraceLoggingLayer, TraceLoggingTransport};
