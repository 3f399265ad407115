//! Fetch-filter-sort orchestration over resolved object ids.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use nonzero_ext::nonzero;
use tokio::sync::{mpsc, Mutex};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::client::MetClient;
use crate::error::MetError;
use crate::models::ObjectRecord;
use crate::query::{ClassificationFilter, IdSpec, IdStream};
use crate::utils::RequestGate;

/// Tunables for concurrent fan-out.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Maximum number of fetches in flight at once
    pub max_in_flight: usize,
    /// Aggregate request rate budget
    pub rate_per_sec: NonZeroU32,
    /// Pause after each fetch-and-filter unit, smoothing burst pressure
    /// on the upstream. Tunable, but must not be removed without an
    /// equivalent pacing mechanism.
    pub unit_pacing: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 40,
            rate_per_sec: nonzero!(40u32),
            unit_pacing: Duration::from_millis(500),
        }
    }
}

/// Caller-facing options for a classification query.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Retain at most this many matching records
    pub limit: Option<usize>,
    /// Case-sensitive substring the classification must contain;
    /// `None` disables the substring test
    pub search_string: Option<String>,
    /// Sort by `objectBeginDate` ascending (default) or descending
    pub ascending: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retain at most `limit` records.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Require the classification to contain `search`.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search_string = Some(search.into());
        self
    }

    /// Sort descending by `objectBeginDate`.
    pub fn descending(mut self) -> Self {
        self.ascending = false;
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            limit: None,
            search_string: None,
            ascending: true,
        }
    }
}

/// One-shot query orchestrator over the collection API.
///
/// Drives the pipeline: resolve ids, fetch each object (sequentially or
/// through a bounded worker pool), apply the selection predicate, and
/// return the matches sorted by `objectBeginDate`. Per-object failures
/// are logged and skipped; only id-resolution and total-count failures
/// abort a query.
#[derive(Debug, Clone)]
pub struct MetQuery {
    client: MetClient,
    config: QueryConfig,
}

impl MetQuery {
    /// Create an orchestrator with default concurrency settings.
    pub fn new(client: MetClient) -> Self {
        Self::with_config(client, QueryConfig::default())
    }

    /// Create an orchestrator with explicit concurrency settings.
    pub fn with_config(client: MetClient, config: QueryConfig) -> Self {
        Self { client, config }
    }

    /// The underlying API client.
    pub fn client(&self) -> &MetClient {
        &self.client
    }

    /// Total number of objects in the collection.
    pub async fn fetch_total(&self) -> Result<u64, MetError> {
        self.client.fetch_total().await
    }

    /// Resolve an id specification into a lazy id stream, querying the
    /// collection total first when the spec covers everything.
    pub async fn resolve_ids(&self, spec: &IdSpec) -> Result<IdStream, MetError> {
        let total = if spec.needs_total() {
            self.client.fetch_total().await?
        } else {
            0
        };
        Ok(spec.resolve(total))
    }

    /// Sequential classification query: one fetch in flight at a time,
    /// stopping early once `limit` matches have been collected.
    pub async fn query_by_classification(
        &self,
        spec: &IdSpec,
        options: &QueryOptions,
    ) -> Result<Vec<ObjectRecord>, MetError> {
        let ids = self.resolve_ids(spec).await?;
        let filter = ClassificationFilter::from(options.search_string.clone());

        let mut results = Vec::new();
        for object_id in ids {
            if options.limit.is_some_and(|limit| results.len() >= limit) {
                break;
            }
            match self.client.fetch_object(object_id).await {
                Ok(Some(record)) if filter.matches(&record) => results.push(record),
                // Non-matching records and skipped statuses need no
                // report here; the fetch layer already logged the latter
                Ok(_) => {}
                Err(err) => warn!(object_id, error = %err, "failed to fetch object, skipping"),
            }
        }

        sort_by_begin_date(&mut results, options.ascending);
        info!(matched = results.len(), "classification query finished");
        Ok(results)
    }

    /// Concurrent classification query over a bounded worker pool.
    ///
    /// A feeder task streams ids into a bounded channel and closes it;
    /// `max_in_flight` workers pull ids, pass the request gate, fetch
    /// and filter; a single collector retains matches up to `limit`.
    /// Fan-out is not cancelled when the limit fills: in-flight units
    /// run to completion and their records are received and dropped.
    /// Which qualifying records fill a limited result is therefore
    /// completion-order dependent; ordering within the result is always
    /// deterministic via the final sort.
    pub async fn query_by_classification_concurrent(
        &self,
        spec: &IdSpec,
        options: &QueryOptions,
    ) -> Result<Vec<ObjectRecord>, MetError> {
        let ids = self.resolve_ids(spec).await?;
        let filter = Arc::new(ClassificationFilter::from(options.search_string.clone()));
        // One gate per query invocation, dropped when the query returns
        let gate = Arc::new(RequestGate::new(
            self.config.rate_per_sec,
            self.config.max_in_flight,
        ));

        let (id_tx, id_rx) = mpsc::channel::<u64>(self.config.max_in_flight.max(1) * 2);
        let id_rx = Arc::new(Mutex::new(id_rx));
        let (record_tx, mut record_rx) = mpsc::channel::<ObjectRecord>(self.config.max_in_flight.max(1));

        let feeder = tokio::spawn(async move {
            for object_id in ids {
                if id_tx.send(object_id).await.is_err() {
                    break;
                }
            }
        });

        let mut workers = Vec::with_capacity(self.config.max_in_flight);
        for worker_id in 0..self.config.max_in_flight {
            let client = self.client.clone();
            let filter = Arc::clone(&filter);
            let gate = Arc::clone(&gate);
            let id_rx = Arc::clone(&id_rx);
            let record_tx = record_tx.clone();
            let pacing = self.config.unit_pacing;

            workers.push(tokio::spawn(async move {
                loop {
                    let object_id = {
                        let mut rx = id_rx.lock().await;
                        match rx.recv().await {
                            Some(id) => id,
                            None => break,
                        }
                    };

                    let permit = gate.admit().await;
                    let fetched = client.fetch_object(object_id).await;
                    drop(permit);

                    match fetched {
                        Ok(Some(record)) if filter.matches(&record) => {
                            if record_tx.send(record).await.is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(err) => {
                            warn!(object_id, error = %err, "failed to fetch object, skipping")
                        }
                    }

                    if pacing > Duration::ZERO {
                        sleep(pacing).await;
                    }
                }
                debug!(worker_id, "worker drained");
            }));
        }
        drop(record_tx);

        let limit = options.limit;
        let collector = tokio::spawn(async move {
            let mut results = Vec::new();
            while let Some(record) = record_rx.recv().await {
                // Keep receiving so workers never block, but drop
                // anything past the limit
                if limit.is_some_and(|limit| results.len() >= limit) {
                    continue;
                }
                results.push(record);
            }
            results
        });

        let _ = feeder.await;
        join_all(workers).await;
        let mut results = collector
            .await
            .map_err(|e| MetError::Api(format!("collector task failed: {}", e)))?;

        sort_by_begin_date(&mut results, options.ascending);
        info!(matched = results.len(), "concurrent classification query finished");
        Ok(results)
    }
}

/// Sort records by `objectBeginDate`, missing dates lowest (`i64::MIN`
/// sentinel), ties broken by ascending `objectID`. Descending order is
/// the exact reverse, so output order is deterministic for a given set.
fn sort_by_begin_date(records: &mut [ObjectRecord], ascending: bool) {
    records.sort_by(|a, b| {
        let key = |record: &ObjectRecord| {
            (
                record.object_begin_date().unwrap_or(i64::MIN),
                record.object_id().unwrap_or(0),
            )
        };
        let ordering = key(a).cmp(&key(b));
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(object_id: u64, begin_date: Option<i64>) -> ObjectRecord {
        let mut value = json!({"objectID": object_id});
        if let Some(date) = begin_date {
            value["objectBeginDate"] = json!(date);
        }
        ObjectRecord::from_value(value).unwrap()
    }

    fn ids(records: &[ObjectRecord]) -> Vec<u64> {
        records.iter().filter_map(|r| r.object_id()).collect()
    }

    #[test]
    fn test_sort_ascending_by_begin_date() {
        let mut records = vec![
            record(1, Some(1880)),
            record(2, Some(-200)),
            record(3, Some(1540)),
        ];
        sort_by_begin_date(&mut records, true);
        assert_eq!(ids(&records), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_descending_reverses() {
        let mut records = vec![
            record(1, Some(1880)),
            record(2, Some(-200)),
            record(3, Some(1540)),
        ];
        sort_by_begin_date(&mut records, false);
        assert_eq!(ids(&records), vec![1, 3, 2]);
    }

    #[test]
    fn test_missing_date_sorts_lowest() {
        let mut records = vec![record(1, Some(-5000)), record(2, None)];
        sort_by_begin_date(&mut records, true);
        assert_eq!(ids(&records), vec![2, 1]);

        sort_by_begin_date(&mut records, false);
        assert_eq!(ids(&records), vec![1, 2]);
    }

    #[test]
    fn test_equal_dates_tie_break_by_object_id() {
        let mut records = vec![
            record(9, Some(1700)),
            record(3, Some(1700)),
            record(6, Some(1700)),
        ];
        sort_by_begin_date(&mut records, true);
        assert_eq!(ids(&records), vec![3, 6, 9]);
    }

    #[test]
    fn test_query_options_defaults() {
        let options = QueryOptions::new();
        assert!(options.ascending);
        assert!(options.limit.is_none());
        assert!(options.search_string.is_none());

        let options = QueryOptions::new().limit(5).search("Textiles").descending();
        assert_eq!(options.limit, Some(5));
        assert_eq!(options.search_string.as_deref(), Some("Textiles"));
        assert!(!options.ascending);
    }
}
