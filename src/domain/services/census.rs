// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::domain::models::item::Item;
use crate::domain::models::temporal::TimeRange;
use crate::domain::search::engine::{CatalogError, ItemSource};
use crate::domain::search::request::ItemsQuery;
use crate::utils::retry_policy::RetryPolicy;

/// Frequency counter over code-valued item properties
/// (`monty:country_codes`, `monty:hazard_codes`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeCounter {
    counts: HashMap<String, u64>,
}

impl CodeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, code: impl Into<String>) {
        *self.counts.entry(code.into()).or_insert(0) += 1;
    }

    /// Count every element of the item's array-valued property.
    pub fn record_item(&mut self, item: &Item, property: &str) {
        for code in item.string_array(property) {
            self.record(code);
        }
    }

    pub fn merge(&mut self, other: CodeCounter) {
        for (code, count) in other.counts {
            *self.counts.entry(code).or_insert(0) += count;
        }
    }

    pub fn get(&self, code: &str) -> u64 {
        self.counts.get(code).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum over all codes.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Codes ordered by descending frequency, ties by code.
    pub fn most_common(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<_> = self
            .counts
            .iter()
            .map(|(code, count)| (code.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

/// One time bin whose fetch failed after retry exhaustion.
#[derive(Debug)]
pub struct BinFailure {
    pub bin: TimeRange,
    pub error: CatalogError,
}

/// Aggregation outcome: merged counts plus the bins that could not be
/// fetched. Partial results are reported, never silently dropped.
#[derive(Debug, Default)]
pub struct CensusReport {
    pub counts: CodeCounter,
    pub failures: Vec<BinFailure>,
}

impl CensusReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Per-collection total, as produced by [`Census::event_totals`].
#[derive(Debug)]
pub struct CollectionTotal {
    pub collection_id: String,
    pub result: Result<u64, CatalogError>,
}

/// 跨时间分箱的事件统计服务
///
/// 将一个集合的条目按时间分箱并发抓取，统计代码型属性的出现频次。
/// 仅传输错误按重试策略重试；鉴权与查询错误立即上抛。
pub struct Census {
    source: Arc<dyn ItemSource>,
    retry: RetryPolicy,
    max_concurrency: usize,
    page_size: u32,
}

impl Census {
    pub fn new(source: Arc<dyn ItemSource>) -> Self {
        Self {
            source,
            retry: RetryPolicy::standard(),
            max_concurrency: 10,
            page_size: 250,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Count code occurrences of `property` across all items of
    /// `collection_id`, fetched one time bin at a time.
    pub async fn code_counts(
        &self,
        collection_id: &str,
        property: &str,
        bins: &[TimeRange],
    ) -> CensusReport {
        let fetches = bins.iter().map(|bin| {
            let query = ItemsQuery::new(self.page_size)
                .with_datetime(*bin)
                .with_fields([format!("properties.{property}")]);
            async move {
                let result = self.items_with_retry(collection_id, &query).await;
                (bin, result)
            }
        });

        let mut report = CensusReport::default();
        let mut stream = stream::iter(fetches).buffer_unordered(self.max_concurrency);
        while let Some((bin, result)) = stream.next().await {
            match result {
                Ok(items) => {
                    debug!(
                        collection_id,
                        bin = %bin.label(),
                        items = items.len(),
                        "census bin fetched"
                    );
                    for item in &items {
                        report.counts.record_item(item, property);
                    }
                }
                Err(error) => {
                    warn!(collection_id, bin = %bin.label(), %error, "census bin failed");
                    report.failures.push(BinFailure { bin: *bin, error });
                }
            }
        }
        report
    }

    /// Total event count per collection, optionally windowed.
    ///
    /// Results come back in input order; failures are carried per
    /// collection instead of aborting the sweep.
    pub async fn event_totals(
        &self,
        collection_ids: &[String],
        range: Option<&TimeRange>,
    ) -> Vec<CollectionTotal> {
        let fetches = collection_ids.iter().map(|collection_id| async move {
            let result = self.count_with_retry(collection_id, range).await;
            CollectionTotal {
                collection_id: collection_id.clone(),
                result,
            }
        });

        stream::iter(fetches)
            .buffered(self.max_concurrency)
            .collect()
            .await
    }

    async fn items_with_retry(
        &self,
        collection_id: &str,
        query: &ItemsQuery,
    ) -> Result<Vec<Item>, CatalogError> {
        let mut attempt = 0u32;
        loop {
            match self.source.items(collection_id, query).await {
                Ok(items) => return Ok(items),
                Err(error) => attempt = self.admit_retry(collection_id, attempt, error).await?,
            }
        }
    }

    async fn count_with_retry(
        &self,
        collection_id: &str,
        range: Option<&TimeRange>,
    ) -> Result<u64, CatalogError> {
        let mut attempt = 0u32;
        loop {
            match self.source.event_count(collection_id, range).await {
                Ok(count) => return Ok(count),
                Err(error) => attempt = self.admit_retry(collection_id, attempt, error).await?,
            }
        }
    }

    /// Back off and bump the attempt counter, or give the error back
    /// when it is not retriable (anything but `Transport`) or the
    /// policy is exhausted.
    async fn admit_retry(
        &self,
        collection_id: &str,
        attempt: u32,
        error: CatalogError,
    ) -> Result<u32, CatalogError> {
        if !matches!(error, CatalogError::Transport(_)) {
            return Err(error);
        }
        let attempt = attempt + 1;
        if !self.retry.should_retry(attempt) {
            return Err(error);
        }
        let backoff = self.retry.calculate_backoff(attempt);
        warn!(collection_id, attempt, backoff_ms = backoff.as_millis() as u64, %error, "retrying after transport failure");
        tokio::time::sleep(backoff).await;
        Ok(attempt)
    }
}
