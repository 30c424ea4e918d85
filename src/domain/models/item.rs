// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single catalog record: one disaster/hazard event.
///
/// Items arrive as GeoJSON features. Fields other than `id` and
/// `collection` are optional because `fields`-trimmed responses omit
/// everything that was not requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Item {
    /// Property key holding ISO 3166-1 alpha-3 country codes.
    pub const COUNTRY_CODES: &'static str = "monty:country_codes";
    /// Property key holding hazard classification codes.
    pub const HAZARD_CODES: &'static str = "monty:hazard_codes";
    /// Property key correlating records of one event across sources.
    pub const CORR_ID: &'static str = "monty:corr_id";
    /// Property key holding the nominal event instant.
    pub const DATETIME: &'static str = "datetime";

    pub fn new(id: String, collection: String) -> Self {
        Self {
            id,
            collection,
            geometry: None,
            bbox: None,
            properties: Map::new(),
            links: Vec::new(),
        }
    }

    /// Look up an arbitrary property value.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// The event instant, parsed from the `datetime` property.
    pub fn datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.property(Self::DATETIME)
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }

    pub fn country_codes(&self) -> Vec<String> {
        self.string_array(Self::COUNTRY_CODES)
    }

    pub fn hazard_codes(&self) -> Vec<String> {
        self.string_array(Self::HAZARD_CODES)
    }

    pub fn corr_id(&self) -> Option<&str> {
        self.property(Self::CORR_ID).and_then(Value::as_str)
    }

    /// Read an array-valued property as owned strings, skipping
    /// non-string elements.
    pub fn string_array(&self, key: &str) -> Vec<String> {
        self.property(key)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Hypermedia link attached to items, pages and collections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub href: String,
    pub rel: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One page of search or item-listing results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Item>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(
        default,
        rename = "numberMatched",
        skip_serializing_if = "Option::is_none"
    )]
    pub number_matched: Option<u64>,
    #[serde(
        default,
        rename = "numberReturned",
        skip_serializing_if = "Option::is_none"
    )]
    pub number_returned: Option<u64>,
}

impl FeatureCollection {
    /// The href of the follow-up page, if the server advertised one.
    pub fn next_link(&self) -> Option<&str> {
        next_href(&self.links)
    }
}

pub(crate) fn next_href(links: &[Link]) -> Option<&str> {
    links
        .iter()
        .find(|link| link.rel == "next")
        .map(|link| link.href.as_str())
}
