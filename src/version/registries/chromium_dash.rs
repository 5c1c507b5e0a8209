//! Chromium release dashboard implementation

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::platform::Platform;
use crate::version::entry::Release;
use crate::version::error::RegistryError;
use crate::version::registries::http_client;
use crate::version::registry::ReleaseRegistry;
use crate::version::value::Version;

/// Default base URL for the release dashboard
const DEFAULT_BASE_URL: &str = "https://chromiumdash.appspot.com";

/// Response from the `fetch_version` endpoint
#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(default)]
    chromium_main_branch_position: Option<u64>,
}

/// Registry implementation for the Chromium release dashboard
#[derive(Clone)]
pub struct ChromiumDashRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl ChromiumDashRegistry {
    /// Creates a new ChromiumDashRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, RegistryError> {
        Url::parse_with_params(&format!("{}/{}", self.base_url, path), params)
            .map_err(|e| RegistryError::InvalidUrl(e.to_string()))
    }

    /// Looks up the main-branch position a version was cut from
    pub async fn fetch_branch_position(
        &self,
        version: Version,
    ) -> Result<Option<u64>, RegistryError> {
        let version_str = version.to_string();
        let url = self.endpoint("fetch_version", &[("version", version_str.as_str())])?;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!("Release dashboard does not know version {}", version);
            return Ok(None);
        }

        if !status.is_success() {
            warn!("Release dashboard returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let info: Option<VersionInfo> = response.json().await.map_err(|e| {
            warn!("Failed to parse release dashboard version response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        Ok(info.and_then(|info| info.chromium_main_branch_position))
    }
}

impl Default for ChromiumDashRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl ReleaseRegistry for ChromiumDashRegistry {
    async fn fetch_releases(
        &self,
        platform: Platform,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<Release>, RegistryError> {
        let limit = limit.to_string();
        let url = self.endpoint(
            "fetch_releases",
            &[
                ("channel", channel),
                ("platform", platform.os().dashboard_name()),
                ("num", limit.as_str()),
                ("offset", "0"),
            ],
        )?;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            warn!("Release dashboard returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let releases: Vec<Release> = response.json().await.map_err(|e| {
            warn!("Failed to parse release dashboard response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        debug!("Fetched {} {} releases for {}", releases.len(), channel, platform);
        Ok(releases)
    }
}
