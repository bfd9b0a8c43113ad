//! Time sources.
//!
//! Penalty windows, match timers and session TTLs all read time through
//! `Clock`, so tests can drive them with `ManualClock` instead of sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A monotonic-enough source of timestamps, measured from an arbitrary epoch.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time since the clock's epoch.
    fn now(&self) -> Duration;
}

/// Shared clock handle.
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock, measured from the UNIX epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}

/// Hand-driven clock for deterministic tests.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// give another to the engine.
///
/// ```
/// use std::time::Duration;
/// use set_engine::core::{Clock, ManualClock};
///
/// let clock = ManualClock::new(Duration::from_secs(100));
/// let handle = clock.clone();
/// clock.advance(Duration::from_secs(5));
/// assert_eq!(handle.now(), Duration::from_secs(105));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading `start`.
    #[must_use]
    pub fn new(start: Duration) -> Self {
        Self {
            micros: Arc::new(AtomicU64::new(start.as_micros() as u64)),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.micros.fetch_add(by.as_micros() as u64, Ordering::SeqCst);
    }

    /// Jump to an absolute time.
    pub fn set(&self, to: Duration) {
        self.micros.store(to.as_micros() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::SeqCst))
    }
}
