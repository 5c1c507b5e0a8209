//! Registry implementations for Chromium releases and snapshot binaries

pub mod chromium_dash;
pub mod snapshots;

pub use chromium_dash::ChromiumDashRegistry;
pub use snapshots::SnapshotLocator;

use crate::config::FETCH_TIMEOUT;

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("chromium-fetcher")
        .timeout(FETCH_TIMEOUT)
        .build()
        .expect("Failed to create HTTP client")
}
