//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → TRACE_TRANSPORT environment override
//!     → validation.rs (semantic checks)
//!     → TraceConfig (validated, immutable)
//!     → Tracer::from_config builds sink, redactor and catalog
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_default, ConfigError, TRACE_ENV};
pub use schema::{Destination, ObservabilityConfig, OutputConfig, RedactionConfig, TraceConfig};
pub use validation::ValidationError;
