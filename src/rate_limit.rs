use crate::error::ChannelError;
use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::debug;

pub const MAX_REQUESTS_PER_SECOND: u16 = 20;
pub const MAX_REQUESTS_PER_TWO_MINUTES: u16 = 100;

const TWO_MINUTES: Duration = Duration::from_secs(120);

/// Call limits for one API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    pub per_second: u16,
    pub per_two_minutes: u16,
}

impl Default for RateLimits {
    fn default() -> Self {
        RateLimits {
            per_second: MAX_REQUESTS_PER_SECOND,
            per_two_minutes: MAX_REQUESTS_PER_TWO_MINUTES,
        }
    }
}

impl RateLimits {
    pub fn new(per_second: u16, per_two_minutes: u16) -> Result<Self, ChannelError> {
        let limits = RateLimits {
            per_second,
            per_two_minutes,
        };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> Result<(), ChannelError> {
        if self.per_second == 0 || self.per_two_minutes == 0 {
            return Err(ChannelError::ConfigError(format!(
                "rate limits must be non-zero (per second: {}, per two minutes: {})",
                self.per_second, self.per_two_minutes
            )));
        }
        Ok(())
    }
}

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Blocks callers until both the short and the rolling window admit another call.
pub struct Throttle {
    per_second: DirectLimiter,
    per_window: DirectLimiter,
    clock: DefaultClock,
}

impl Throttle {
    pub fn new(limits: RateLimits) -> Result<Self, ChannelError> {
        limits.validate()?;
        let per_second = nonzero(limits.per_second)?;
        let per_window = nonzero(limits.per_two_minutes)?;

        let window_quota = Quota::with_period(TWO_MINUTES / u32::from(limits.per_two_minutes))
            .ok_or_else(|| ChannelError::ConfigError("rolling window quota is empty".to_string()))?
            .allow_burst(per_window);

        Ok(Throttle {
            per_second: RateLimiter::direct(Quota::per_second(per_second)),
            per_window: RateLimiter::direct(window_quota),
            clock: DefaultClock::default(),
        })
    }

    /// Waits until a call is admitted by both quotas.
    pub fn acquire(&self) {
        Self::wait_for(&self.per_window, &self.clock);
        Self::wait_for(&self.per_second, &self.clock);
    }

    /// Admits a call without waiting, if possible.
    pub fn try_acquire(&self) -> bool {
        self.per_window.check().is_ok() && self.per_second.check().is_ok()
    }

    fn wait_for(limiter: &DirectLimiter, clock: &DefaultClock) {
        while let Err(not_until) = limiter.check() {
            let wait = not_until.wait_time_from(clock.now());
            debug!(wait_ms = wait.as_millis() as u64, "Rate limited, waiting");
            thread::sleep(wait);
        }
    }
}

fn nonzero(value: u16) -> Result<NonZeroU32, ChannelError> {
    NonZeroU32::new(u32::from(value))
        .ok_or_else(|| ChannelError::ConfigError("rate limit must be non-zero".to_string()))
}
