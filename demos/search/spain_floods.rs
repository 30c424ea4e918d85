// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Query the Montandon catalog for Spain flood events of the
//! October/November 2024 window across all event collections.
//!
//! Requires `MONTANDON_API_TOKEN` to be set.

use std::sync::Arc;

use montyrs::config::settings::Settings;
use montyrs::domain::filter::{Expr, TemporalInterval};
use montyrs::domain::models::item::Item;
use montyrs::domain::search::engine::EventCatalog;
use montyrs::domain::search::request::SearchRequest;
use montyrs::infrastructure::stac::{EnvToken, StacClient};
use montyrs::utils::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();

    let settings = Settings::new()?;
    let tokens = Arc::new(EnvToken::from_settings(&settings.api));
    let client = StacClient::new(&settings, tokens)?;

    let filter = Expr::and(vec![
        Expr::a_contains(Item::COUNTRY_CODES, "ESP"),
        Expr::a_overlaps(Item::HAZARD_CODES, ["nat-hyd-flo-flo", "FL"]),
        Expr::t_intersects(
            Item::DATETIME,
            TemporalInterval::new("2024-10-01T00:00:00Z", "2024-11-05T23:59:59Z"),
        ),
    ]);
    let request = SearchRequest::new([
        "glide-events",
        "gdacs-events",
        "emdat-events",
        "reference-events",
    ])
    .with_filter(filter)
    .with_limit(100);

    let items = client.search(&request).await?;
    println!("{} matching events", items.len());
    for item in &items {
        println!(
            "{:<14} {:<28} {} {:?}",
            item.collection,
            item.id,
            item.datetime()
                .map(|instant| instant.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
            item.hazard_codes(),
        );
    }
    Ok(())
}
