use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Outgoing request budget shared by every call of one adapter.
#[derive(Clone)]
pub struct RequestThrottle {
    limiter: Arc<DirectRateLimiter>,
    clock: DefaultClock,
    max_wait: Duration,
}

impl RequestThrottle {
    /// `quota_limit` requests per `quota_window`, bursting up to the full quota.
    /// A request that would need to wait longer than `max_wait` is rejected.
    pub fn new(quota_window: Duration, quota_limit: u32, max_wait: Duration) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::direct(quota_from_window(
                quota_window,
                quota_limit,
            ))),
            clock: DefaultClock::default(),
            max_wait,
        }
    }

    /// Tries to take one cell of budget; on exhaustion returns the wait the
    /// limiter recommends.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        self.limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Waits for budget when the recommended delay is within `max_wait`.
    pub async fn acquire(&self) -> Result<(), Duration> {
        match self.try_acquire() {
            Ok(()) => Ok(()),
            Err(wait) if wait <= self.max_wait => {
                tokio::time::sleep(wait).await;
                self.try_acquire()
            }
            Err(wait) => Err(wait),
        }
    }
}

fn quota_from_window(quota_window: Duration, quota_limit: u32) -> Quota {
    let burst = NonZeroU32::new(quota_limit.max(1)).unwrap_or(NonZeroU32::MIN);
    let seconds_per_cell = (quota_window.as_secs_f64() / f64::from(burst.get())).max(0.001);

    Quota::with_period(Duration::from_secs_f64(seconds_per_cell))
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_once_burst_is_spent() {
        let throttle = RequestThrottle::new(Duration::from_secs(60), 2, Duration::ZERO);

        assert!(throttle.try_acquire().is_ok());
        assert!(throttle.try_acquire().is_ok());

        let wait = throttle.try_acquire().expect_err("third request exceeds quota");
        assert!(wait > Duration::ZERO);
        assert!(wait <= Duration::from_secs(30));
    }

    #[tokio::test]
    async fn long_waits_are_not_slept_through() {
        let throttle = RequestThrottle::new(Duration::from_secs(60), 1, Duration::from_millis(5));
        assert!(throttle.acquire().await.is_ok());
        assert!(throttle.acquire().await.is_err());
    }
}
