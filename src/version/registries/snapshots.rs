//! Chromium snapshot bucket implementation
//!
//! Snapshot builds live at `{segment}/{branch_position}/{filename}.zip`
//! in the `chromium-browser-snapshots` bucket. A build exists when listing
//! the branch directory returns that archive.

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::platform::Platform;
use crate::version::error::RegistryError;
use crate::version::registries::{ChromiumDashRegistry, http_client};
use crate::version::registry::BinaryLocator;
use crate::version::value::Version;

/// Default base URL for the storage API
pub const DEFAULT_STORAGE_URL: &str = "https://www.googleapis.com/storage/v1";

const BUCKET: &str = "chromium-browser-snapshots";

/// Response from the object listing endpoint
#[derive(Debug, Deserialize)]
struct ObjectList {
    #[serde(default)]
    items: Vec<StorageObject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageObject {
    name: String,
    media_link: String,
}

/// Locates snapshot binaries, resolving branch positions through the dashboard
pub struct SnapshotLocator {
    client: reqwest::Client,
    storage_url: String,
    dashboard: ChromiumDashRegistry,
}

impl SnapshotLocator {
    /// Creates a new SnapshotLocator with a custom storage base URL
    pub fn new(storage_url: &str, dashboard: ChromiumDashRegistry) -> Self {
        Self {
            client: http_client(),
            storage_url: storage_url.trim_end_matches('/').to_string(),
            dashboard,
        }
    }
}

impl Default for SnapshotLocator {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_URL, ChromiumDashRegistry::default())
    }
}

#[async_trait::async_trait]
impl BinaryLocator for SnapshotLocator {
    async fn branch_position(&self, version: Version) -> Result<Option<u64>, RegistryError> {
        self.dashboard.fetch_branch_position(version).await
    }

    async fn binary_url(
        &self,
        branch_position: u64,
        platform: Platform,
    ) -> Result<Option<String>, RegistryError> {
        let prefix = format!("{}/{}/", platform.snapshot_segment(), branch_position);
        let url = Url::parse_with_params(
            &format!("{}/b/{}/o", self.storage_url, BUCKET),
            &[
                ("delimiter", "/"),
                ("prefix", prefix.as_str()),
                ("fields", "items(mediaLink,name)"),
            ],
        )
        .map_err(|e| RegistryError::InvalidUrl(e.to_string()))?;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            warn!("Snapshot storage returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let listing: ObjectList = response.json().await.map_err(|e| {
            warn!("Failed to parse snapshot listing: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        let archive = format!("{}{}.zip", prefix, platform.snapshot_filename());
        let found = listing
            .items
            .into_iter()
            .find(|item| item.name == archive)
            .map(|item| item.media_link);

        debug!(
            "Snapshot {} {}",
            archive,
            if found.is_some() { "found" } else { "missing" }
        );
        Ok(found)
    }
}
