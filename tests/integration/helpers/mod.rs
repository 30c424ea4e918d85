// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use serde_json::{json, Value};

use montyrs::config::settings::Settings;
use montyrs::infrastructure::stac::{StacClient, StaticToken, TokenProvider};

/// Bearer value the mock endpoints expect.
pub const BEARER: &str = "Bearer test-token";

/// Settings pointed at a mock server, mirroring the real layout where
/// the STAC root lives under a `/stac` path.
pub fn settings_for(server_uri: &str) -> Settings {
    let mut settings = Settings::default();
    settings.api.base_url = format!("{server_uri}/stac");
    settings.http.timeout_secs = 5;
    settings
}

pub fn client_for(server_uri: &str) -> StacClient {
    client_with_tokens(server_uri, Arc::new(StaticToken::new("test-token")))
}

pub fn client_with_tokens(server_uri: &str, tokens: Arc<dyn TokenProvider>) -> StacClient {
    StacClient::new(&settings_for(server_uri), tokens).expect("client builds against mock server")
}

/// One event feature in the shape the catalog serves.
pub fn feature(
    id: &str,
    collection: &str,
    countries: &[&str],
    hazards: &[&str],
    datetime: &str,
) -> Value {
    json!({
        "type": "Feature",
        "id": id,
        "collection": collection,
        "geometry": null,
        "properties": {
            "datetime": datetime,
            "monty:country_codes": countries,
            "monty:hazard_codes": hazards,
            "monty:corr_id": format!("corr-{id}")
        },
        "links": []
    })
}

pub fn feature_collection(features: Vec<Value>) -> Value {
    let returned = features.len();
    json!({
        "type": "FeatureCollection",
        "features": features,
        "numberReturned": returned,
        "links": []
    })
}
