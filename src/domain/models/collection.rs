// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::models::item::{next_href, Link};

/// A named grouping of items from a single data source
/// (e.g. `gdacs-events`). Identifiers are opaque strings owned by the
/// remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub summaries: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Collection {
    /// Summary key carrying the precomputed item count.
    pub const COUNT_SUMMARY: &'static str = "monty:count";

    /// True when the collection carries event records rather than
    /// reference or impact data.
    pub fn is_event_collection(&self) -> bool {
        self.roles.iter().any(|role| role == "event")
    }

    /// Precomputed item count from the collection summaries, when the
    /// source publishes one.
    pub fn event_count_summary(&self) -> Option<u64> {
        self.summaries.get(Self::COUNT_SUMMARY).and_then(Value::as_u64)
    }
}

/// One page of the collection listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CollectionPage {
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl CollectionPage {
    pub fn next_link(&self) -> Option<&str> {
        next_href(&self.links)
    }
}
