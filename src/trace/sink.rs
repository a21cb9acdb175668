//! Destinations for trace records.
//!
//! A sink receives fully formatted text; it never parses or reorders it.
//! Sinks are shared across concurrent calls, so every implementation must
//! keep a single `write` from interleaving with another.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Target used by [`TracingSink`] events.
pub const TRACE_TARGET: &str = "http_trace";

pub trait TraceSink: Send + Sync {
    /// Write one formatted chunk of trace output.
    fn write(&self, text: &str);

    /// A disabled sink discards output; the transport then skips dumping.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Discards everything. Used when tracing is turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn write(&self, _text: &str) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Emits each chunk as a `tracing` event on the [`TRACE_TARGET`] target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn write(&self, text: &str) {
        tracing::debug!(target: TRACE_TARGET, "{}", text);
    }
}

/// Writes to any `io::Write`, one locked write per chunk.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl WriterSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl WriterSink<File> {
    /// Append to `path`, creating the file if needed.
    pub fn append(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> TraceSink for WriterSink<W> {
    fn write(&self, text: &str) {
        let mut writer = self.lock();
        let result = writer.write_all(text.as_bytes());
        if let Err(e) = result.and_then(|_| writer.flush()) {
            tracing::warn!(error = %e, "Failed to write trace output");
        }
    }
}

/// Collects output in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl TraceSink for MemorySink {
    fn write(&self, text: &str) {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_str(text);
    }
}
