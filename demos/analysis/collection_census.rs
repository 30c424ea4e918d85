// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Event totals per collection, plus a hazard-code census for GDACS
//! events binned by half-century.
//!
//! Requires `MONTANDON_API_TOKEN` to be set.

use std::sync::Arc;

use montyrs::config::settings::Settings;
use montyrs::domain::models::item::Item;
use montyrs::domain::models::temporal::TimeRange;
use montyrs::domain::services::census::Census;
use montyrs::infrastructure::stac::{EnvToken, StacClient};
use montyrs::utils::retry_policy::RetryPolicy;
use montyrs::utils::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();

    let settings = Settings::new()?;
    let tokens = Arc::new(EnvToken::from_settings(&settings.api));
    let client = Arc::new(StacClient::new(&settings, tokens)?);

    let event_collections = client.event_collections().await?;
    let ids: Vec<String> = event_collections
        .iter()
        .map(|collection| collection.id.clone())
        .collect();
    println!("{} event collections", ids.len());

    let census = Census::new(client)
        .with_retry_policy(RetryPolicy::slow())
        .with_max_concurrency(settings.census.max_concurrency)
        .with_page_size(settings.catalog.page_size);

    for total in census.event_totals(&ids, None).await {
        match total.result {
            Ok(count) => println!("{:<24} {count}", total.collection_id),
            Err(error) => println!("{:<24} error: {error}", total.collection_id),
        }
    }

    let bins = TimeRange::year_bins(1800, 50);
    let report = census
        .code_counts("gdacs-events", Item::HAZARD_CODES, &bins)
        .await;
    println!(
        "\ngdacs-events hazard codes ({} bins, {} failed):",
        bins.len(),
        report.failures.len()
    );
    for (code, count) in report.counts.most_common() {
        println!("{code:<20} {count}");
    }
    Ok(())
}
