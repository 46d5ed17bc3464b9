// Snapshot transport and the periodic refresh task

pub mod client;
pub mod refresher;

use std::sync::Arc;

pub use client::{load_boundary, FireClient};
pub use refresher::FeedRefresher;

use crate::config::AppConfig;
use firewatch_core::FetchError;

/// Starts the refresh task against the configured sources.
pub fn spawn_refresher(config: &AppConfig) -> Result<FeedRefresher, FetchError> {
    let client = Arc::new(FireClient::new(config)?);
    log::info!(
        "refreshing every {}s from {} (fallback {}, {:?})",
        config.refresh_interval.as_secs(),
        config.primary_url(),
        config.fallback.describe(),
        client.strategy()
    );

    Ok(FeedRefresher::start(
        move || {
            let client = Arc::clone(&client);
            async move { client.fetch().await }
        },
        config.refresh_interval,
    ))
}
