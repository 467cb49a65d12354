use std::num::NonZeroU32;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

use crate::{config::RateLimit, error::Error};

/// Token bucket consulted once per inbound request.
///
/// Refills `per_second` units every second and holds at most `burst` units.
/// The check-and-decrement is a single atomic step inside `governor`, so
/// concurrent callers never double-spend a unit.
pub struct RateGate {
    limiter: DefaultDirectRateLimiter,
}

impl RateGate {
    pub fn new(rate: RateLimit) -> Result<Self, Error> {
        let per_second = NonZeroU32::new(rate.per_second)
            .ok_or_else(|| Error::Config("rate limit must be greater than zero".into()))?;
        let burst = NonZeroU32::new(rate.burst)
            .ok_or_else(|| Error::Config("burst must be greater than zero".into()))?;

        let quota = Quota::per_second(per_second).allow_burst(burst);
        Ok(Self {
            limiter: RateLimiter::direct(quota),
        })
    }

    /// Takes one unit from the bucket. Never blocks.
    pub fn allow(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateGate").finish_non_exhaustive()
    }
}
