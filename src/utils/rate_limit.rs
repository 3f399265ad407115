//! Request gating for concurrent fan-out.
//!
//! Two independent controls, both required by the upstream API budget:
//! a token-bucket throttle capping the aggregate request rate and a
//! counting semaphore bounding how many fetches are in flight at once.

use std::num::NonZeroU32;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tokio::sync::{Semaphore, SemaphorePermit};

/// Combined rate throttle and in-flight admission gate.
///
/// Constructed once per query invocation and owned by the orchestrator;
/// the gate is not shared across queries.
pub struct RequestGate {
    throttle: DefaultDirectRateLimiter,
    admission: Semaphore,
}

impl RequestGate {
    /// Create a gate allowing `rate_per_sec` requests per second and
    /// at most `max_in_flight` concurrent requests.
    pub fn new(rate_per_sec: NonZeroU32, max_in_flight: usize) -> Self {
        Self::with_quota(Quota::per_second(rate_per_sec), max_in_flight)
    }

    /// Create a gate from an explicit quota.
    pub fn with_quota(quota: Quota, max_in_flight: usize) -> Self {
        Self {
            throttle: RateLimiter::direct(quota),
            admission: Semaphore::new(max_in_flight),
        }
    }

    /// Wait until a request may be issued. The returned permit must be
    /// held for the duration of the request; dropping it frees an
    /// in-flight slot.
    pub async fn admit(&self) -> SemaphorePermit<'_> {
        let permit = self
            .admission
            .acquire()
            .await
            .expect("admission semaphore closed");
        self.throttle.until_ready().await;
        permit
    }
}
