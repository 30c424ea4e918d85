// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::filter::Expr;
use crate::domain::models::temporal::TimeRange;

/// Default page size for `/search` requests.
pub const DEFAULT_SEARCH_LIMIT: u32 = 100;

/// Filter grammar tag sent alongside the filter body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterLang {
    #[default]
    #[serde(rename = "cql2-json")]
    Cql2Json,
}

/// One `/search` call, serialized verbatim as the POST body.
///
/// Immutable once built; construct per query and discard after the
/// call. A limit beyond the server's page cap is clamped remotely, the
/// client does not enforce an upper bound.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, message = "at least one collection id is required"))]
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expr>,
    #[serde(rename = "filter-lang", default)]
    pub filter_lang: FilterLang,
    pub limit: u32,
}

impl SearchRequest {
    pub fn new<I, S>(collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            collections: collections.into_iter().map(Into::into).collect(),
            filter: None,
            filter_lang: FilterLang::default(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_filter(mut self, filter: Expr) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Query over a single collection's item listing.
#[derive(Debug, Clone, Default)]
pub struct ItemsQuery {
    /// Page size requested from the server.
    pub limit: u32,
    /// Closed temporal window, encoded as the `datetime` parameter.
    pub datetime: Option<TimeRange>,
    /// `fields` selection; empty means full items.
    pub fields: Vec<String>,
}

impl ItemsQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            datetime: None,
            fields: Vec::new(),
        }
    }

    pub fn with_datetime(mut self, range: TimeRange) -> Self {
        self.datetime = Some(range);
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Key/value pairs for the request query string.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        if let Some(range) = &self.datetime {
            pairs.push(("datetime", range.to_query()));
        }
        if !self.fields.is_empty() {
            pairs.push(("fields", self.fields.join(",")));
        }
        pairs
    }
}
