//! Time source for trace records.
//!
//! Wall time is printed in the record headers; elapsed time is always
//! computed from the monotonic half of the stamp so clock adjustments
//! between request and response cannot produce negative durations.

use chrono::{DateTime, Local, SecondsFormat};
use std::time::{Duration, Instant};

/// A point in time captured at both wall and monotonic resolution.
#[derive(Debug, Clone, Copy)]
pub struct Stamp {
    pub wall: DateTime<Local>,
    pub instant: Instant,
}

impl Stamp {
    /// RFC3339 with second precision, e.g. `2024-05-01T12:00:00+02:00`.
    pub fn rfc3339(&self) -> String {
        self.wall.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Monotonic time elapsed since `earlier`. Saturates at zero.
    pub fn since(&self, earlier: &Stamp) -> Duration {
        self.instant.saturating_duration_since(earlier.instant)
    }
}

/// Source of [`Stamp`]s.
pub trait Clock: Send + Sync {
    fn now(&self) -> Stamp;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Stamp {
        Stamp {
            wall: Local::now(),
            instant: Instant::now(),
        }
    }
}

/// Render a duration as whole milliseconds, rounded to nearest.
pub fn format_millis(elapsed: Duration) -> String {
    format!("{:.0}ms", elapsed.as_secs_f64() * 1000.0)
}
