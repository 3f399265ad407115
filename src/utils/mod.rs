//! Utilities supporting the fetch pipeline.
//!
//! - [`RetryConfig`] / [`with_retry`]: fixed-backoff retry for transient
//!   transport failures, testable in isolation with short backoffs.
//! - [`RequestGate`]: combined rate throttle and in-flight admission gate
//!   for concurrent fan-out.

mod rate_limit;
mod retry;

pub use rate_limit::RequestGate;
pub(crate) use retry::transient_transport;
pub use retry::{with_retry, RetryConfig};
