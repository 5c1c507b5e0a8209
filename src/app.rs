//! Run orchestration and store maintenance

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, RELEASE_FETCH_LIMIT};
use crate::download::{DownloadError, Downloader};
use crate::version::entry::{MappedEntry, RawRelease, Release};
use crate::version::error::{ResolveError, StoreError};
use crate::version::filter::filter_and_map;
use crate::version::registry::{BinaryLocator, ReleaseRegistry};
use crate::version::resolver::{Notifier, Resolver, SelectionPrompt};
use crate::version::store::{NegativeHitStorer, PersistentStore, Store};
use crate::version::value::Version;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("No binary found for version {0}")]
    NoBinaryForSingleVersion(Version),

    #[error("Could not check whether version {0} has a binary")]
    CheckFailed(Version),
}

/// What a run ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The binary was written to this path
    Downloaded(PathBuf),
    /// A binary exists but downloading is disabled
    Url(String),
    /// No candidate led to a binary
    Exhausted,
}

pub struct App {
    releases: Arc<dyn ReleaseRegistry>,
    resolver: Resolver,
    downloader: Downloader,
}

impl App {
    pub fn new(
        releases: Arc<dyn ReleaseRegistry>,
        locator: Arc<dyn BinaryLocator>,
        prompt: Arc<dyn SelectionPrompt>,
        notifier: Arc<dyn Notifier>,
        downloader: Downloader,
    ) -> Self {
        Self {
            releases,
            resolver: Resolver::new(locator, prompt, notifier),
            downloader,
        }
    }

    /// Fetches the release list and turns it into the candidate list
    ///
    /// A failed fetch is logged and treated as an empty release list.
    pub async fn candidates<S>(&self, config: &Config, store: &S) -> Result<Vec<MappedEntry>, AppError>
    where
        S: NegativeHitStorer + ?Sized,
    {
        let releases = if config.single.is_some() {
            Vec::new()
        } else {
            self.fetch_releases(config).await
        };

        let raw = releases.into_iter().map(RawRelease::from);
        Ok(filter_and_map(raw, config, store)?)
    }

    async fn fetch_releases(&self, config: &Config) -> Vec<Release> {
        match self
            .releases
            .fetch_releases(config.platform, &config.channel, RELEASE_FETCH_LIMIT)
            .await
        {
            Ok(releases) => {
                debug!("Fetched {} releases for {}", releases.len(), config.platform);
                releases
            }
            Err(e) => {
                warn!("Failed to fetch releases for {}: {}", config.platform, e);
                Vec::new()
            }
        }
    }

    /// Resolves a binary for the configured constraints and downloads it
    pub async fn run<S>(&self, config: &Config, store: &mut S) -> Result<RunOutcome, AppError>
    where
        S: NegativeHitStorer + ?Sized,
    {
        let candidates = self.candidates(config, &*store).await?;
        let resolution = self.resolver.resolve(config, candidates, store).await?;

        let Some(url) = resolution.url else {
            if let Some(single) = config.single {
                if resolution.unreachable {
                    return Err(AppError::CheckFailed(single));
                }
                return Err(AppError::NoBinaryForSingleVersion(single));
            }
            info!("No selectable version found");
            return Ok(RunOutcome::Exhausted);
        };

        let Some(selected) = resolution.selected else {
            return Ok(RunOutcome::Url(url));
        };

        if !config.download {
            return Ok(RunOutcome::Url(url));
        }

        let path = self
            .downloader
            .download(
                &url,
                selected.version(),
                config.platform,
                &config.download_folder,
                config.unzip,
            )
            .await?;
        Ok(RunOutcome::Downloaded(path))
    }
}

/// Renders candidates one per line, marking known negative hits
pub fn format_candidates(entries: &[MappedEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            if entry.is_disabled() {
                format!("{} (no binary)", entry.version())
            } else {
                entry.version().to_string()
            }
        })
        .collect()
}

/// Serializes the store, writing it to `file` when given
///
/// Returns the JSON when no file is given.
pub fn export_store(store: &Store, file: Option<&Path>) -> Result<Option<String>, StoreError> {
    match file {
        Some(path) => {
            store.save(path)?;
            info!("Exported {} negative hits to {:?}", store.len(), path);
            Ok(None)
        }
        None => store.to_json().map(Some),
    }
}

/// Merges a store file into the persistent store
pub fn import_store(store: &mut PersistentStore, file: &Path) -> Result<usize, StoreError> {
    let raw = std::fs::read_to_string(file)?;
    let other = Store::try_from_json(&raw)?;
    store.import(&other)
}
