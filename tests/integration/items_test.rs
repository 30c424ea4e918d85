// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use montyrs::domain::models::temporal::TimeRange;
use montyrs::domain::search::request::ItemsQuery;

use crate::helpers;

#[tokio::test]
async fn test_items_single_page_with_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stac/collections/usgs-events/items"))
        .and(header("authorization", helpers::BEARER))
        .and(query_param("limit", "500"))
        .and(query_param(
            "datetime",
            "1934-01-01T00:00:00Z/1938-12-31T23:59:59Z",
        ))
        .and(query_param("fields", "properties.monty:country_codes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [
                {"properties": {"monty:country_codes": ["USA"]}},
                {"properties": {"monty:country_codes": ["JPN", "USA"]}}
            ],
            "numberMatched": 2,
            "links": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = helpers::client_for(&server.uri());
    let query = ItemsQuery::new(500)
        .with_datetime(TimeRange::from_years(1934, 1938))
        .with_fields(["properties.monty:country_codes"]);

    let items = client
        .all_items("usgs-events", &query)
        .await
        .expect("items fetch succeeds");
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].country_codes(), vec!["JPN", "USA"]);
}

#[tokio::test]
async fn test_items_follow_next_links() {
    let server = MockServer::start().await;
    let next_href = format!(
        "{}/stac/collections/gdacs-events/items?page=2",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/stac/collections/gdacs-events/items"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [
                helpers::feature("g-1", "gdacs-events", &["ESP"], &["FL"], "2024-10-29T08:00:00Z"),
                helpers::feature("g-2", "gdacs-events", &["FRA"], &["TC"], "2024-10-30T00:00:00Z")
            ],
            "links": [{"href": next_href, "rel": "next"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stac/collections/gdacs-events/items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [
                helpers::feature("g-3", "gdacs-events", &["ITA"], &["FL"], "2024-11-01T00:00:00Z")
            ],
            "links": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = helpers::client_for(&server.uri());
    let items = client
        .all_items("gdacs-events", &ItemsQuery::new(2))
        .await
        .expect("items fetch succeeds");

    let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["g-1", "g-2", "g-3"]);
}

#[tokio::test]
async fn test_items_page_exposes_number_matched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stac/collections/emdat-events/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [],
            "numberMatched": 26764,
            "links": []
        })))
        .mount(&server)
        .await;

    let client = helpers::client_for(&server.uri());
    let page = client
        .items_page("emdat-events", &ItemsQuery::new(1))
        .await
        .expect("page fetch succeeds");
    assert!(page.features.is_empty());
    assert_eq!(page.number_matched, Some(26764));
}

#[tokio::test]
async fn test_unknown_collection_yields_zero_matches() {
    let server = MockServer::start().await;
    // 目录对未知集合标识宽容，返回空结果而非报错
    Mock::given(method("GET"))
        .and(path("/stac/collections/no-such-events/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [],
            "numberMatched": 0,
            "links": []
        })))
        .mount(&server)
        .await;

    let client = helpers::client_for(&server.uri());
    let items = client
        .all_items("no-such-events", &ItemsQuery::new(10))
        .await
        .expect("fetch succeeds");
    assert!(items.is_empty());
}
