//! HTTP fetch layer for the collection API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::warn;

use crate::error::MetError;
use crate::models::ObjectRecord;
use crate::utils::{transient_transport, with_retry, RetryConfig};

/// Public collection API endpoint for objects.
pub const MET_COLLECTION_ENDPOINT: &str =
    "https://collectionapi.metmuseum.org/public/collection/v1/objects";

/// Client for the collection API.
///
/// Implements the per-object fetch contract: HTTP 200 parses into an
/// [`ObjectRecord`], a 502 or any other non-200 status is reported and
/// skipped (`Ok(None)`), and transport failures are retried with a fixed
/// backoff before surfacing as a per-object [`MetError::Network`].
#[derive(Debug, Clone)]
pub struct MetClient {
    client: Arc<Client>,
    endpoint: String,
    retry: RetryConfig,
}

impl MetClient {
    /// Create a client against the public collection API.
    pub fn new() -> Self {
        Self::with_endpoint(MET_COLLECTION_ENDPOINT)
    }

    /// Create a client against a custom endpoint (used by tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client: Arc::new(client),
            endpoint: endpoint.into(),
            retry: RetryConfig::default(),
        }
    }

    /// Override the retry policy for transport failures.
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The endpoint this client queries.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the total number of objects in the collection.
    ///
    /// Any failure here is fatal to a whole-collection query, so every
    /// error path maps to [`MetError::TotalUnavailable`].
    pub async fn fetch_total(&self) -> Result<u64, MetError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| MetError::TotalUnavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(MetError::TotalUnavailable(format!(
                "collection index returned status {}",
                response.status()
            )));
        }

        let index: ObjectsIndex = response
            .json()
            .await
            .map_err(|e| MetError::TotalUnavailable(format!("bad index body: {}", e)))?;

        Ok(index.total)
    }

    /// Fetch one object's record.
    ///
    /// Returns `Ok(None)` when the upstream declined the request with a
    /// non-200 status; the caller is expected to skip that id.
    pub async fn fetch_object(&self, object_id: u64) -> Result<Option<ObjectRecord>, MetError> {
        let url = format!("{}/{}", self.endpoint, object_id);

        let response = with_retry(
            self.retry,
            || {
                let client = Arc::clone(&self.client);
                let url = url.clone();
                async move { client.get(&url).send().await }
            },
            transient_transport,
        )
        .await
        .map_err(|e| MetError::Network(format!("object {}: {}", object_id, e)))?;

        match response.status() {
            StatusCode::OK => {
                let record: ObjectRecord = response
                    .json()
                    .await
                    .map_err(|e| MetError::Parse(format!("object {}: {}", object_id, e)))?;
                Ok(Some(record))
            }
            StatusCode::BAD_GATEWAY => {
                warn!(object_id, "upstream unavailable (502), skipping object");
                Ok(None)
            }
            status => {
                warn!(object_id, %status, "unexpected status, skipping object");
                Ok(None)
            }
        }
    }
}

impl Default for MetClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ObjectsIndex {
    total: u64,
}
