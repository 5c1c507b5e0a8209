//! Candidate selection and the try-next-version loop
//!
//! The resolver picks a candidate (single mode, auto-search, or a prompt),
//! checks that a binary exists for it, and on a miss walks the list
//! according to [`OnFail`] until a binary is found or the list runs out.
//! Checks run strictly one at a time because every miss may write to the
//! negative-hit store. A failed store write is logged and the search goes on.

use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, info, warn};

use crate::config::{Config, OnFail};
use crate::platform::Platform;
use crate::version::entry::MappedEntry;
use crate::version::error::{PromptError, RegistryError, ResolveError};
use crate::version::registry::BinaryLocator;
use crate::version::store::NegativeHitStorer;

const SELECT_HINT: &str = "Select a version";

/// Trait for asking which candidate to use
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait SelectionPrompt: Send + Sync {
    /// Returns the canonical version string of the chosen candidate
    ///
    /// `Ok(None)` means nothing was chosen (no selectable entry or the user
    /// cancelled).
    async fn select(
        &self,
        candidates: &[MappedEntry],
        hint: &str,
    ) -> Result<Option<String>, PromptError>;
}

/// Sink for the notices the resolver emits while searching
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Notifier forwarding to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Outcome of a resolution run
///
/// - found: `url` and `selected` are set
/// - exhausted: both are `None`
/// - single version without binary: only `selected` is set
/// - single version whose check failed: `selected` is set and `unreachable` is true
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    pub url: Option<String>,
    pub selected: Option<MappedEntry>,
    /// The existence check itself failed, so a missing `url` proves nothing
    pub unreachable: bool,
}

impl Resolution {
    fn found(url: String, selected: MappedEntry) -> Self {
        Self {
            url: Some(url),
            selected: Some(selected),
            unreachable: false,
        }
    }

    fn exhausted() -> Self {
        Self::default()
    }

    pub fn is_exhausted(&self) -> bool {
        self.url.is_none() && self.selected.is_none()
    }
}

/// Result of checking one candidate
enum Check {
    Found(String),
    Missing,
    /// The check itself failed; nothing is known about the candidate
    Unreachable,
}

/// Groups the collaborators needed to resolve a candidate to a binary URL
pub struct Resolver {
    locator: Arc<dyn BinaryLocator>,
    prompt: Arc<dyn SelectionPrompt>,
    notifier: Arc<dyn Notifier>,
}

impl Resolver {
    pub fn new(
        locator: Arc<dyn BinaryLocator>,
        prompt: Arc<dyn SelectionPrompt>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            locator,
            prompt,
            notifier,
        }
    }

    /// Selects a candidate and searches for a usable binary
    pub async fn resolve<S>(
        &self,
        config: &Config,
        mut candidates: Vec<MappedEntry>,
        store: &mut S,
    ) -> Result<Resolution, ResolveError>
    where
        S: NegativeHitStorer + ?Sized,
    {
        if candidates.is_empty() {
            debug!("No candidates to resolve");
            return Ok(Resolution::exhausted());
        }

        if config.single.is_some() {
            let entry = candidates[0];
            return Ok(match self.check(config, entry, store).await? {
                Check::Found(url) => Resolution::found(url, entry),
                Check::Missing => Resolution {
                    url: None,
                    selected: Some(entry.mark_disabled()),
                    unreachable: false,
                },
                Check::Unreachable => Resolution {
                    url: None,
                    selected: Some(entry),
                    unreachable: true,
                },
            });
        }

        let Some(mut index) = self.initial_selection(config, &candidates).await? else {
            return Ok(Resolution::exhausted());
        };

        loop {
            let entry = candidates[index];
            match self.check(config, entry, store).await? {
                Check::Found(url) if config.download => return Ok(Resolution::found(url, entry)),
                Check::Found(_) | Check::Unreachable => {}
                Check::Missing => candidates[index] = entry.mark_disabled(),
            }

            let next = match config.on_fail {
                OnFail::Increase => index.checked_sub(1),
                OnFail::Decrease => Some(index + 1).filter(|&next| next < candidates.len()),
                OnFail::Nothing => self.prompt_selection(&candidates).await?,
            };

            let Some(next) = next else {
                debug!("Candidates exhausted");
                return Ok(Resolution::exhausted());
            };

            if config.on_fail != OnFail::Nothing && !candidates[next].is_disabled() {
                self.notifier.info(&format!(
                    "Continuing with version {}",
                    candidates[next].version()
                ));
            }
            index = next;
        }
    }

    async fn initial_selection(
        &self,
        config: &Config,
        candidates: &[MappedEntry],
    ) -> Result<Option<usize>, ResolveError> {
        if !config.interactive && config.on_fail == OnFail::Decrease {
            self.notifier.info(&format!(
                "Auto-searching for a binary, starting with version {}",
                candidates[0].version()
            ));
            return Ok(Some(0));
        }

        if config.results == Some(1) {
            return Ok(candidates.iter().position(|entry| !entry.is_disabled()));
        }

        self.prompt_selection(candidates).await
    }

    async fn prompt_selection(
        &self,
        candidates: &[MappedEntry],
    ) -> Result<Option<usize>, ResolveError> {
        let Some(chosen) = self.prompt.select(candidates, SELECT_HINT).await? else {
            return Ok(None);
        };

        let index = candidates
            .iter()
            .position(|entry| entry.version().to_string() == chosen);
        if index.is_none() {
            self.notifier
                .warn(&format!("Selected version {} is not a candidate", chosen));
        }
        Ok(index)
    }

    async fn check<S>(
        &self,
        config: &Config,
        entry: MappedEntry,
        store: &mut S,
    ) -> Result<Check, ResolveError>
    where
        S: NegativeHitStorer + ?Sized,
    {
        let version = entry.version();
        if entry.is_disabled() {
            debug!("Skipping known negative hit {}", version);
            return Ok(Check::Missing);
        }

        match self.locate(entry, config.platform).await {
            Ok(Some(url)) => {
                if !config.download {
                    self.notifier
                        .warn(&format!("Not downloading binary for version {}", version));
                }
                Ok(Check::Found(url))
            }
            Ok(None) => {
                debug!("No binary for {} on {}", version, config.platform);
                if config.store {
                    if let Err(e) = store.record_negative_hit(config.platform, version) {
                        warn!("Could not remember missing version {}: {}", version, e);
                    }
                }
                Ok(Check::Missing)
            }
            Err(e) => {
                self.notifier
                    .warn(&format!("Could not check version {}: {}", version, e));
                Ok(Check::Unreachable)
            }
        }
    }

    async fn locate(
        &self,
        entry: MappedEntry,
        platform: Platform,
    ) -> Result<Option<String>, RegistryError> {
        let branch_position = match entry.branch_position() {
            Some(position) => Some(position),
            None => self.locator.branch_position(entry.version()).await?,
        };

        match branch_position {
            Some(position) => self.locator.binary_url(position, platform).await,
            None => Ok(None),
        }
    }
}
