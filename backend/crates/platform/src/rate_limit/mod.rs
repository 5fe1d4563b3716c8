//! Rate Limiting Infrastructure
//!
//! Fixed-window request limiting shared by every public write endpoint.
//!
//! - [`policy`] - `"10/minute"` policy strings
//! - [`key`] - time-bucketed counter keys
//! - [`clock`] - wall-clock source (injectable for tests)
//! - [`memory`] - in-process counters, the fallback of last resort
//! - [`redis_store`] - counters shared across processes (Redis)
//! - [`limiter`] - the orchestrator handlers call before doing any work
//!
//! Windows are fixed, not sliding: a client can burst up to twice the
//! configured count across a window boundary.

pub mod clock;
pub mod error;
pub mod key;
pub mod limiter;
pub mod memory;
pub mod policy;
pub mod redis_store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::RateLimitError;
pub use limiter::{RateLimitSettings, RateLimiter};
pub use memory::MemoryCounterStore;
pub use policy::RateLimitPolicy;
pub use redis_store::RedisCounterStore;

/// Outcome of one counter increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Counter value after this request was counted
    pub count: u64,
    pub remaining: u32,
}

impl RateLimitDecision {
    pub fn from_count(count: u64, policy: &RateLimitPolicy) -> Self {
        let max = u64::from(policy.max_requests());
        Self {
            allowed: count <= max,
            count,
            remaining: max.saturating_sub(count) as u32,
        }
    }
}

/// Trait for counter backends shared between processes
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count one request against `key` and decide whether it is admitted.
    ///
    /// Implementations must perform the increment and the expiry refresh
    /// atomically, in a single round trip.
    async fn increment_and_check(
        &self,
        key: &str,
        policy: &RateLimitPolicy,
    ) -> Result<RateLimitDecision, RateLimitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_at_limit() {
        let policy = RateLimitPolicy::new(2, 60).unwrap();

        let first = RateLimitDecision::from_count(1, &policy);
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);

        let second = RateLimitDecision::from_count(2, &policy);
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);

        let third = RateLimitDecision::from_count(3, &policy);
        assert!(!third.allowed);
        assert_eq!(third.remaining, 0);
    }
}
