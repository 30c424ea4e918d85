// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::filter::FilterError;
use crate::domain::models::item::Item;
use crate::domain::models::temporal::TimeRange;
use crate::domain::search::request::{ItemsQuery, SearchRequest};
use async_trait::async_trait;
use thiserror::Error;

/// Failure taxonomy of one catalog call.
///
/// Nothing here is retried automatically; `Transport` is the only
/// class a caller may reasonably retry on its own.
#[derive(Debug, Error, Clone)]
pub enum CatalogError {
    /// Missing, invalid or expired bearer token. Raised before any
    /// filter validation when the token cannot be resolved at all.
    #[error("Authentication failed: {0}")]
    Authentication(String),
    /// The catalog rejected the query (400-class), typically a
    /// malformed filter tree or unknown property. Carries the server
    /// diagnostic.
    #[error("Query rejected by catalog (HTTP {status}): {message}")]
    Query { status: u16, message: String },
    /// The filter tree failed client-side structural validation.
    #[error("Invalid filter expression: {0}")]
    Filter(#[from] FilterError),
    /// The search request itself is malformed (e.g. no collections).
    #[error("Invalid search request: {0}")]
    Request(String),
    /// Connectivity, timeout or 5xx failure.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// A catalog that can be searched for disaster events.
#[async_trait]
pub trait EventCatalog: Send + Sync {
    /// Execute a search and materialize the first page of matches.
    ///
    /// A single request-response exchange: no retry, no pagination
    /// following. Result order is whatever the server ranked and must
    /// not be assumed stable across identical calls.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Item>, CatalogError>;

    /// Get the name of the catalog backend
    fn name(&self) -> &'static str;
}

/// Read access to per-collection item listings, the seam the census
/// service aggregates over.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// All items of a collection matching the query, across pages.
    async fn items(
        &self,
        collection_id: &str,
        query: &ItemsQuery,
    ) -> Result<Vec<Item>, CatalogError>;

    /// Total matching item count, resolved as cheaply as the catalog
    /// allows.
    async fn event_count(
        &self,
        collection_id: &str,
        range: Option<&TimeRange>,
    ) -> Result<u64, CatalogError>;
}
