//! Traits for the remote sources the resolver consults

#[cfg(test)]
use mockall::automock;

use crate::platform::Platform;
use crate::version::entry::Release;
use crate::version::error::RegistryError;
use crate::version::value::Version;

/// Trait for fetching the list of published releases
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseRegistry: Send + Sync {
    /// Fetches up to `limit` releases of `channel` for the platform
    ///
    /// # Returns
    /// * `Ok(Vec<Release>)` - Releases in the order the source publishes them
    /// * `Err(RegistryError)` - If the fetch fails
    async fn fetch_releases(
        &self,
        platform: Platform,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<Release>, RegistryError>;
}

/// Trait for checking whether a build binary exists
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait BinaryLocator: Send + Sync {
    /// Looks up the branch position a version was cut from
    ///
    /// Returns `Ok(None)` when the version is unknown to the source.
    async fn branch_position(&self, version: Version) -> Result<Option<u64>, RegistryError>;

    /// Looks up the download URL of the build at a branch position
    ///
    /// Returns `Ok(None)` when no binary exists for the platform.
    async fn binary_url(
        &self,
        branch_position: u64,
        platform: Platform,
    ) -> Result<Option<String>, RegistryError>;
}
