//! Query pipeline: id resolution, selection predicate, and the
//! fetch-filter-sort orchestrator.
//!
//! The pipeline runs in one of two modes. Sequential mode keeps a single
//! fetch in flight and short-circuits once the result limit is reached.
//! Concurrent mode fans out over a bounded worker pool behind a
//! [`RequestGate`](crate::utils::RequestGate); fan-out is never cancelled
//! early, but the collector stops retaining records at the limit.

mod filter;
mod ids;
mod orchestrator;

pub use filter::ClassificationFilter;
pub use ids::{IdSegment, IdSpec, IdStream};
pub use orchestrator::{MetQuery, QueryConfig, QueryOptions};
