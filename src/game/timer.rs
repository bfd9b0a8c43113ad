//! Match timer with pause accounting.
//!
//! Active time is `elapsed_before_pause + (now - started)` while running and
//! `elapsed_before_pause` while paused. Paused intervals accumulate
//! separately so penalties can be shifted by them.

use std::time::Duration;

/// Timer fields of one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchTimer {
    started: Duration,
    paused_at: Option<Duration>,
    elapsed_before_pause: Duration,
    elapsed_during_pause: Duration,
}

impl MatchTimer {
    /// Start a fresh timer at `now`.
    #[must_use]
    pub fn new(now: Duration) -> Self {
        Self {
            started: now,
            paused_at: None,
            elapsed_before_pause: Duration::ZERO,
            elapsed_during_pause: Duration::ZERO,
        }
    }

    /// Zero every accumulator and restart at `now`.
    pub fn reset(&mut self, now: Duration) {
        *self = Self::new(now);
    }

    /// True between `pause` and `resume`.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Pause at `now`, folding the running interval into the active total.
    ///
    /// Returns false if already paused.
    pub fn pause(&mut self, now: Duration) -> bool {
        if self.paused_at.is_some() {
            return false;
        }
        self.elapsed_before_pause += now.saturating_sub(self.started);
        self.paused_at = Some(now);
        true
    }

    /// Resume at `now`. The running start always moves to `now`.
    ///
    /// Returns the interval just spent paused, or `None` if not paused.
    pub fn resume(&mut self, now: Duration) -> Option<Duration> {
        self.started = now;
        let paused_at = self.paused_at.take()?;
        let interval = now.saturating_sub(paused_at);
        self.elapsed_during_pause += interval;
        Some(interval)
    }

    /// Timestamp that is exactly "active time ago" from the last resume.
    ///
    /// `now - reference()` is the active time since the baseline while
    /// running.
    #[must_use]
    pub fn reference(&self) -> Duration {
        self.started.saturating_sub(self.elapsed_before_pause)
    }

    /// Active (unpaused) time since the baseline.
    #[must_use]
    pub fn active_elapsed(&self, now: Duration) -> Duration {
        match self.paused_at {
            Some(_) => self.elapsed_before_pause,
            None => self.elapsed_before_pause + now.saturating_sub(self.started),
        }
    }

    /// Total time spent paused since the baseline.
    #[must_use]
    pub fn paused_total(&self) -> Duration {
        self.elapsed_during_pause
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_pause_excludes_paused_interval() {
        let mut timer = MatchTimer::new(secs(1000));

        assert!(timer.pause(secs(1010)));
        assert_eq!(timer.active_elapsed(secs(1050)), secs(10));

        assert_eq!(timer.resume(secs(1060)), Some(secs(50)));
        assert_eq!(timer.active_elapsed(secs(1065)), secs(15));
        assert_eq!(timer.paused_total(), secs(50));
        assert_eq!(secs(1065) - timer.reference(), secs(15));
    }

    #[test]
    fn test_double_pause_is_ignored() {
        let mut timer = MatchTimer::new(secs(0));
        assert!(timer.pause(secs(5)));
        assert!(!timer.pause(secs(8)));
        assert_eq!(timer.resume(secs(10)), Some(secs(5)));
        assert_eq!(timer.active_elapsed(secs(10)), secs(5));
    }

    #[test]
    fn test_resume_without_pause() {
        let mut timer = MatchTimer::new(secs(100));
        assert_eq!(timer.resume(secs(130)), None);
        assert_eq!(timer.active_elapsed(secs(135)), secs(5));
        assert_eq!(timer.reference(), secs(130));
    }

    #[test]
    fn test_reset() {
        let mut timer = MatchTimer::new(secs(0));
        timer.pause(secs(10));
        timer.resume(secs(20));
        timer.reset(secs(40));

        assert_eq!(timer, MatchTimer::new(secs(40)));
        assert!(!timer.is_paused());
    }
}
