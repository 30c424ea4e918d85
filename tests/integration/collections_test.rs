// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use montyrs::domain::models::temporal::TimeRange;

use crate::helpers;

#[tokio::test]
async fn test_collections_follow_pagination() {
    let server = MockServer::start().await;
    let next_href = format!("{}/stac/collections?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/stac/collections"))
        .and(query_param("limit", "100"))
        .and(header("authorization", helpers::BEARER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collections": [
                {"id": "gdacs-events", "roles": ["event", "source"]},
                {"id": "gdacs-impacts", "roles": ["impact"]}
            ],
            "links": [{"href": next_href, "rel": "next"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/stac/collections"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collections": [
                {"id": "emdat-events", "roles": ["event"]}
            ],
            "links": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = helpers::client_for(&server.uri());
    let collections = client.collections().await.expect("listing succeeds");

    let ids: Vec<_> = collections.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["gdacs-events", "gdacs-impacts", "emdat-events"]);
}

#[tokio::test]
async fn test_event_collections_filter_by_role() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stac/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collections": [
                {"id": "gdacs-events", "roles": ["event"]},
                {"id": "gdacs-impacts", "roles": ["impact"]},
                {"id": "reference-events", "roles": ["event", "reference"]}
            ],
            "links": []
        })))
        .mount(&server)
        .await;

    let client = helpers::client_for(&server.uri());
    let events = client
        .event_collections()
        .await
        .expect("listing succeeds");

    let ids: Vec<_> = events.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["gdacs-events", "reference-events"]);
}

#[tokio::test]
async fn test_collection_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stac/collections/glide-events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "glide-events",
            "title": "GLIDE events",
            "roles": ["event"],
            "summaries": {"monty:count": 8213}
        })))
        .mount(&server)
        .await;

    let client = helpers::client_for(&server.uri());
    let collection = client
        .collection("glide-events")
        .await
        .expect("metadata fetch succeeds");

    assert_eq!(collection.id, "glide-events");
    assert!(collection.is_event_collection());
    assert_eq!(collection.event_count_summary(), Some(8213));
}

#[tokio::test]
async fn test_count_prefers_collection_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stac/collections/glide-events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "glide-events",
            "summaries": {"monty:count": 8213}
        })))
        .expect(1)
        .mount(&server)
        .await;
    // 摘要已给出计数，不应触发条目端点
    Mock::given(method("GET"))
        .and(path("/stac/collections/glide-events/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(helpers::feature_collection(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let client = helpers::client_for(&server.uri());
    let count = client.count("glide-events", None).await.expect("count");
    assert_eq!(count, 8213);
}

#[tokio::test]
async fn test_count_falls_back_to_number_matched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stac/collections/usgs-events"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "usgs-events", "summaries": {}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stac/collections/usgs-events/items"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [helpers::feature(
                "usgs-1",
                "usgs-events",
                &["USA"],
                &["GEO"],
                "1989-10-18T00:04:00Z"
            )],
            "numberMatched": 77421,
            "links": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = helpers::client_for(&server.uri());
    let count = client.count("usgs-events", None).await.expect("count");
    assert_eq!(count, 77421);
}

#[tokio::test]
async fn test_count_manual_fallback_pages_through_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stac/collections/desinventar-events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "desinventar-events"})))
        .mount(&server)
        .await;
    // 探测页没有 numberMatched
    Mock::given(method("GET"))
        .and(path("/stac/collections/desinventar-events/items"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [helpers::feature(
                "d-1",
                "desinventar-events",
                &["COL"],
                &["FL"],
                "2001-05-02T00:00:00Z"
            )],
            "links": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let next_href = format!(
        "{}/stac/collections/desinventar-events/items?page=2",
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/stac/collections/desinventar-events/items"))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [
                helpers::feature("d-1", "desinventar-events", &["COL"], &["FL"], "2001-05-02T00:00:00Z"),
                helpers::feature("d-2", "desinventar-events", &["COL"], &["FL"], "2003-11-20T00:00:00Z")
            ],
            "links": [{"href": next_href, "rel": "next"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stac/collections/desinventar-events/items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [
                helpers::feature("d-3", "desinventar-events", &["COL"], &["DR"], "2010-08-14T00:00:00Z")
            ],
            "links": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = helpers::client_for(&server.uri());
    let count = client
        .count("desinventar-events", None)
        .await
        .expect("count");
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_windowed_count_skips_collection_summary() {
    let server = MockServer::start().await;
    // 按时间窗计数时摘要无效，不应请求集合元数据
    Mock::given(method("GET"))
        .and(path("/stac/collections/glide-events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "glide-events",
            "summaries": {"monty:count": 8213}
        })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stac/collections/glide-events/items"))
        .and(query_param("limit", "1"))
        .and(query_param(
            "datetime",
            "2024-01-01T00:00:00Z/2024-12-31T23:59:59Z",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [],
            "numberMatched": 412,
            "links": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = helpers::client_for(&server.uri());
    let range = TimeRange::from_years(2024, 2024);
    let count = client
        .count("glide-events", Some(&range))
        .await
        .expect("count");
    assert_eq!(count, 412);
}
