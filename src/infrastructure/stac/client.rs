// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use validator::Validate;

use crate::config::settings::Settings;
use crate::domain::models::collection::{Collection, CollectionPage};
use crate::domain::models::item::{FeatureCollection, Item};
use crate::domain::models::temporal::TimeRange;
use crate::domain::search::engine::{CatalogError, EventCatalog, ItemSource};
use crate::domain::search::request::{ItemsQuery, SearchRequest};
use crate::infrastructure::stac::auth::TokenProvider;

/// Montandon STAC API client.
///
/// One pooled HTTP client shared by all calls; every call is an
/// independent, stateless request-response exchange carrying a bearer
/// token resolved from the injected [`TokenProvider`].
///
/// This implementation provides:
/// - CQL2-JSON `/search` execution with pre-flight filter validation
/// - Collection listing and metadata with `next`-link pagination
/// - Per-collection item listing with temporal filtering and field
///   selection
/// - Item-count resolution with layered fallback strategies
pub struct StacClient {
    client: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
    page_size: u32,
    collection_page_size: u32,
}

impl StacClient {
    /// Build a client from settings and a credential provider.
    ///
    /// # Arguments
    /// * `settings` - API endpoint and HTTP pool configuration
    /// * `tokens` - bearer-token source consulted on every call
    pub fn new(settings: &Settings, tokens: Arc<dyn TokenProvider>) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.http.timeout_secs))
            .pool_max_idle_per_host(settings.http.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(settings.http.pool_idle_timeout_secs))
            .build()
            .map_err(|e| CatalogError::Request(format!("failed to build HTTP client: {e}")))?;
        let base_url = Url::parse(settings.api.base_url.trim_end_matches('/')).map_err(|e| {
            CatalogError::Request(format!("invalid base url `{}`: {e}", settings.api.base_url))
        })?;
        Ok(Self {
            client,
            base_url,
            tokens,
            page_size: settings.catalog.page_size,
            collection_page_size: settings.catalog.collection_page_size,
        })
    }

    /// List every collection the catalog publishes, following
    /// pagination links.
    pub async fn collections(&self) -> Result<Vec<Collection>, CatalogError> {
        let token = self.tokens.token()?;
        let mut url = self.endpoint(&["collections"])?;
        url.set_query(Some(&format!("limit={}", self.collection_page_size)));

        let mut collections = Vec::new();
        let mut next = Some(url);
        while let Some(page_url) = next {
            let page: CollectionPage = self.get_json(page_url, &token).await?;
            next = page.next_link().map(parse_link).transpose()?;
            collections.extend(page.collections);
        }
        debug!(collections = collections.len(), "collection listing complete");
        Ok(collections)
    }

    /// Collections carrying the `event` role.
    pub async fn event_collections(&self) -> Result<Vec<Collection>, CatalogError> {
        Ok(self
            .collections()
            .await?
            .into_iter()
            .filter(|collection| collection.is_event_collection())
            .collect())
    }

    /// Metadata of a single collection.
    pub async fn collection(&self, collection_id: &str) -> Result<Collection, CatalogError> {
        let token = self.tokens.token()?;
        let url = self.endpoint(&["collections", collection_id])?;
        self.get_json(url, &token).await
    }

    /// One page of a collection's item listing.
    pub async fn items_page(
        &self,
        collection_id: &str,
        query: &ItemsQuery,
    ) -> Result<FeatureCollection, CatalogError> {
        let token = self.tokens.token()?;
        let url = self.items_url(collection_id, query)?;
        self.get_json(url, &token).await
    }

    /// All items of a collection matching the query, following
    /// `next`-link pagination to the end.
    pub async fn all_items(
        &self,
        collection_id: &str,
        query: &ItemsQuery,
    ) -> Result<Vec<Item>, CatalogError> {
        let token = self.tokens.token()?;
        let mut items = Vec::new();
        let mut pages = 0u32;
        let mut next = Some(self.items_url(collection_id, query)?);
        while let Some(page_url) = next {
            let page: FeatureCollection = self.get_json(page_url, &token).await?;
            pages += 1;
            next = page.next_link().map(parse_link).transpose()?;
            items.extend(page.features);
        }
        debug!(collection_id, pages, items = items.len(), "item listing complete");
        Ok(items)
    }

    /// Resolve the matching item count as cheaply as the catalog
    /// allows.
    ///
    /// Strategies, in order:
    /// 1. the collection's `monty:count` summary (untimed counts only);
    /// 2. `numberMatched` from a single-item probe;
    /// 3. manual pagination count, as a last resort.
    pub async fn count(
        &self,
        collection_id: &str,
        range: Option<&TimeRange>,
    ) -> Result<u64, CatalogError> {
        if range.is_none() {
            if let Some(count) = self.collection(collection_id).await?.event_count_summary() {
                debug!(collection_id, count, "count from collection summary");
                return Ok(count);
            }
        }

        let mut probe = ItemsQuery::new(1);
        if let Some(range) = range {
            probe = probe.with_datetime(*range);
        }
        let page = self.items_page(collection_id, &probe).await?;
        if let Some(count) = page.number_matched {
            debug!(collection_id, count, "count from numberMatched");
            return Ok(count);
        }

        warn!(
            collection_id,
            "catalog reports no numberMatched, falling back to manual count"
        );
        let mut full = ItemsQuery::new(self.page_size);
        if let Some(range) = range {
            full = full.with_datetime(*range);
        }
        Ok(self.all_items(collection_id, &full).await?.len() as u64)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| CatalogError::Request("base url cannot carry a path".into()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    fn items_url(&self, collection_id: &str, query: &ItemsQuery) -> Result<Url, CatalogError> {
        let mut url = self.endpoint(&["collections", collection_id, "items"])?;
        let query_string = serde_urlencoded::to_string(query.to_query_pairs())
            .map_err(|e| CatalogError::Request(format!("invalid items query: {e}")))?;
        url.set_query(Some(&query_string));
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        token: &str,
    ) -> Result<T, CatalogError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response)
            .await?
            .json::<T>()
            .await
            .map_err(transport_error)
    }
}

#[async_trait]
impl EventCatalog for StacClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Item>, CatalogError> {
        // Token resolution comes first: a missing credential surfaces
        // before the filter is even looked at.
        let token = self.tokens.token()?;

        if request.limit == 0 {
            return Ok(Vec::new());
        }
        request
            .validate()
            .map_err(|e| CatalogError::Request(e.to_string()))?;
        if let Some(filter) = &request.filter {
            filter.validate()?;
        }

        let url = self.endpoint(&["search"])?;
        debug!(
            collections = ?request.collections,
            limit = request.limit,
            filtered = request.filter.is_some(),
            "executing catalog search"
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&token)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        let page: FeatureCollection = check_status(response)
            .await?
            .json()
            .await
            .map_err(transport_error)?;
        debug!(
            returned = page.features.len(),
            matched = ?page.number_matched,
            "search page received"
        );
        Ok(page.features)
    }

    fn name(&self) -> &'static str {
        "montandon-stac"
    }
}

#[async_trait]
impl ItemSource for StacClient {
    async fn items(
        &self,
        collection_id: &str,
        query: &ItemsQuery,
    ) -> Result<Vec<Item>, CatalogError> {
        self.all_items(collection_id, query).await
    }

    async fn event_count(
        &self,
        collection_id: &str,
        range: Option<&TimeRange>,
    ) -> Result<u64, CatalogError> {
        self.count(collection_id, range).await
    }
}

fn parse_link(href: &str) -> Result<Url, CatalogError> {
    Url::parse(href)
        .map_err(|e| CatalogError::Transport(format!("catalog sent invalid next link `{href}`: {e}")))
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = server_diagnostic(&response.text().await.unwrap_or_default());
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(CatalogError::Authentication(format!(
            "HTTP {}: {}",
            status.as_u16(),
            message
        )))
    } else if status.is_client_error() {
        Err(CatalogError::Query {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(CatalogError::Transport(format!(
            "HTTP {}: {}",
            status.as_u16(),
            message
        )))
    }
}

/// Pull the human-readable diagnostic out of an error body.
fn server_diagnostic(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "description", "message"] {
            if let Some(text) = value.get(key).and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no diagnostic provided".to_string()
    } else {
        trimmed.to_string()
    }
}

fn transport_error(error: reqwest::Error) -> CatalogError {
    if error.is_timeout() {
        CatalogError::Transport(format!("request timed out: {error}"))
    } else {
        CatalogError::Transport(error.to_string())
    }
}
