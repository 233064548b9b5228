//! Client-side submission cap.
//!
//! A fixed window: the first admission anchors it, and once `period` has
//! elapsed since the anchor the count starts over. Denials never count.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};

pub const DEFAULT_LIMIT: u32 = 50;
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Rate limit alcanzado ({limit} solicitudes por día)")]
pub struct RateLimitExceeded {
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitInfo {
    pub remaining: u32,
    pub total: u32,
}

#[derive(Debug, Default)]
struct RateLimitWindow {
    count: u32,
    anchor: Option<DateTime<Utc>>,
}

impl RateLimitWindow {
    /// Start over if the current window has run its course.
    fn roll(&mut self, now: DateTime<Utc>, period: Duration) {
        let Some(anchor) = self.anchor else {
            return;
        };
        // A clock that went backwards keeps the current window.
        let expired = (now - anchor)
            .to_std()
            .map(|elapsed| elapsed >= period)
            .unwrap_or(false);
        if expired {
            debug!(previous = self.count, "rate limit window expired");
            *self = RateLimitWindow::default();
        }
    }
}

pub struct RateLimiter {
    limit: u32,
    period: Duration,
    clock: Arc<dyn Clock>,
    window: Mutex<RateLimitWindow>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_PERIOD)
    }
}

impl RateLimiter {
    pub fn new(limit: u32, period: Duration) -> Self {
        Self {
            limit,
            period,
            clock: Arc::new(SystemClock),
            window: Mutex::new(RateLimitWindow::default()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Admit one attempt, or refuse without counting it.
    pub fn check(&self) -> Result<(), RateLimitExceeded> {
        let now = self.clock.now();
        let mut window = self.lock_window();
        window.roll(now, self.period);

        if window.count >= self.limit {
            warn!(limit = self.limit, "rate limit reached");
            return Err(RateLimitExceeded { limit: self.limit });
        }

        window.anchor.get_or_insert(now);
        window.count += 1;
        Ok(())
    }

    pub fn info(&self) -> RateLimitInfo {
        let now = self.clock.now();
        let mut window = self.lock_window();
        window.roll(now, self.period);
        RateLimitInfo {
            remaining: self.limit.saturating_sub(window.count),
            total: self.limit,
        }
    }

    pub fn reset(&self) {
        *self.lock_window() = RateLimitWindow::default();
    }

    fn lock_window(&self) -> MutexGuard<'_, RateLimitWindow> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-10T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn limiter_with_clock(limit: u32) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let limiter = RateLimiter::new(limit, DEFAULT_PERIOD).with_clock(clock.clone());
        (limiter, clock)
    }

    #[test]
    fn fresh_limiter_reports_full_allowance() {
        let limiter = RateLimiter::default();
        assert_eq!(
            limiter.info(),
            RateLimitInfo {
                remaining: 50,
                total: 50
            }
        );
    }

    #[test]
    fn admissions_count_down_remaining() {
        let (limiter, _) = limiter_with_clock(50);
        for _ in 0..3 {
            limiter.check().unwrap();
        }
        assert_eq!(limiter.info().remaining, 47);
    }

    #[test]
    fn denies_at_limit_without_counting() {
        let (limiter, _) = limiter_with_clock(50);
        for _ in 0..50 {
            limiter.check().unwrap();
        }
        let err = limiter.check().unwrap_err();
        assert_eq!(err.to_string(), "Rate limit alcanzado (50 solicitudes por día)");
        assert!(limiter.check().is_err());
        assert_eq!(limiter.info().remaining, 0);
    }

    #[test]
    fn window_resets_after_period() {
        let (limiter, clock) = limiter_with_clock(2);
        limiter.check().unwrap();
        clock.advance(chrono::Duration::hours(23));
        limiter.check().unwrap();
        assert!(limiter.check().is_err());

        // The window is anchored at the first admission, not the last.
        clock.advance(chrono::Duration::hours(1));
        assert_eq!(limiter.info().remaining, 2);
        limiter.check().unwrap();
        assert_eq!(limiter.info().remaining, 1);
    }

    #[test]
    fn clock_going_backwards_keeps_window() {
        let (limiter, clock) = limiter_with_clock(1);
        limiter.check().unwrap();
        clock.set(start() - chrono::Duration::days(3));
        assert!(limiter.check().is_err());
    }

    #[test]
    fn reset_restores_allowance() {
        let (limiter, _) = limiter_with_clock(1);
        limiter.check().unwrap();
        assert!(limiter.check().is_err());
        limiter.reset();
        assert!(limiter.check().is_ok());
    }
}
