//! # met-query
//!
//! Client library for the Met Museum public collection API: enumerate
//! object ids, fetch per-object metadata with rate limiting and retry,
//! filter by classification and image presence, and return results
//! sorted by creation date.
//!
//! ## Architecture
//!
//! - [`models`]: the opaque [`ObjectRecord`] passthrough of the API schema
//! - [`client`]: HTTP fetch layer with retry and status handling
//! - [`query`]: id resolution, selection predicate, and the
//!   fetch-filter-sort orchestrator (sequential and concurrent modes)
//! - [`utils`]: retry policy and the rate-limit/admission gate
//!
//! ## Example
//!
//! ```rust,no_run
//! use met_query::{IdSpec, MetClient, MetQuery, QueryOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), met_query::MetError> {
//! let query = MetQuery::new(MetClient::new());
//! let spec: IdSpec = "7829,9367,13737".parse()?;
//! let options = QueryOptions::new().search("Textiles").limit(5);
//! let records = query.query_by_classification(&spec, &options).await?;
//! for record in &records {
//!     println!("{}", serde_json::to_string(record).unwrap());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod utils;

// Re-export commonly used types
pub use client::{MetClient, MET_COLLECTION_ENDPOINT};
pub use error::MetError;
pub use models::ObjectRecord;
pub use query::{ClassificationFilter, IdSegment, IdSpec, IdStream, MetQuery, QueryConfig, QueryOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
