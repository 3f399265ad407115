//! Error taxonomy for collection queries.

/// Errors that can occur while resolving ids or querying the collection API.
///
/// Per-object fetch failures are deliberately *not* represented here as a
/// dedicated variant: the fetch layer reports a skipped object as
/// `Ok(None)` (upstream 502 or another non-200 status) so that one bad
/// object never aborts a whole batch. Only failures that make the overall
/// query meaningless surface as `MetError`.
#[derive(Debug, thiserror::Error)]
pub enum MetError {
    /// The id specification is unusable (e.g. an empty string)
    #[error("Invalid id input: {0}")]
    InvalidInput(String),

    /// Malformed id token, reversed range, or unparsable JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Transport-level failure after retries were exhausted
    #[error("Network error: {0}")]
    Network(String),

    /// Unexpected upstream behavior that cannot be skipped
    #[error("API error: {0}")]
    Api(String),

    /// The collection object count could not be resolved
    #[error("Total object count unavailable: {0}")]
    TotalUnavailable(String),
}

impl From<reqwest::Error> for MetError {
    fn from(err: reqwest::Error) -> Self {
        MetError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for MetError {
    fn from(err: serde_json::Error) -> Self {
        MetError::Parse(format!("JSON: {}", err))
    }
}
