use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// How long a rejected caller must wait before the window reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAfter {
    pub minutes: i64,
}

#[derive(Debug)]
struct WindowState {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Fixed-window counter keyed by source identifier. State is in-memory and
/// resets with the process, matching the source behavior.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max: u32,
    window: Duration,
    windows: Mutex<HashMap<String, WindowState>>,
}

impl FixedWindowLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count one attempt for `key` at `now`. The clock is an argument so the
    /// window logic stays deterministic under test.
    pub fn check(&self, key: &str, now: DateTime<Utc>) -> Result<(), RetryAfter> {
        let mut windows = self.windows.lock().expect("rate limit mutex poisoned");

        match windows.get_mut(key) {
            Some(state) if now <= state.reset_at => {
                if state.count >= self.max {
                    let remaining = state.reset_at - now;
                    return Err(RetryAfter {
                        minutes: ceil_minutes(remaining),
                    });
                }
                state.count += 1;
                Ok(())
            }
            _ => {
                windows.insert(
                    key.to_string(),
                    WindowState {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                Ok(())
            }
        }
    }
}

fn ceil_minutes(duration: Duration) -> i64 {
    let seconds = duration.num_seconds().max(0);
    (seconds + 59) / 60
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-14T09:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn allows_up_to_the_cap_within_one_window() {
        let limiter = FixedWindowLimiter::new(3, Duration::minutes(60));
        let now = start();

        assert!(limiter.check("10.0.0.1", now).is_ok());
        assert!(limiter.check("10.0.0.1", now).is_ok());
        assert!(limiter.check("10.0.0.1", now).is_ok());

        let denied = limiter
            .check("10.0.0.1", now + Duration::minutes(10))
            .expect_err("fourth attempt is rejected");
        assert_eq!(denied.minutes, 50);
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        let limiter = FixedWindowLimiter::new(3, Duration::minutes(60));
        let now = start();

        for _ in 0..3 {
            assert!(limiter.check("10.0.0.1", now).is_ok());
        }
        assert!(limiter
            .check("10.0.0.1", now + Duration::minutes(61))
            .is_ok());
    }

    #[test]
    fn keys_are_tracked_independently() {
        let limiter = FixedWindowLimiter::new(1, Duration::minutes(60));
        let now = start();

        assert!(limiter.check("10.0.0.1", now).is_ok());
        assert!(limiter.check("10.0.0.2", now).is_ok());
        assert!(limiter.check("10.0.0.1", now).is_err());
    }

    #[test]
    fn retry_after_rounds_up_to_whole_minutes() {
        let limiter = FixedWindowLimiter::new(1, Duration::seconds(90));
        let now = start();

        assert!(limiter.check("10.0.0.1", now).is_ok());
        let denied = limiter
            .check("10.0.0.1", now + Duration::seconds(30))
            .expect_err("second attempt is rejected");
        assert_eq!(denied.minutes, 1);
    }
}
