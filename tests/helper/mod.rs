//! Hand-written collaborators for pipeline tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use chromium_fetcher::app::App;
use chromium_fetcher::config::Config;
use chromium_fetcher::download::Downloader;
use chromium_fetcher::platform::{Arch, Os, Platform};
use chromium_fetcher::version::error::{PromptError, RegistryError};
use chromium_fetcher::version::registry::{BinaryLocator, ReleaseRegistry};
use chromium_fetcher::version::resolver::{Notifier, SelectionPrompt};
use chromium_fetcher::version::{MappedEntry, Release, Version};

pub fn v(s: &str) -> Version {
    Version::parse(s)
}

pub fn linux() -> Platform {
    Platform::new(Os::Linux, Arch::X64).unwrap()
}

/// Release list served from memory
pub struct FakeReleases {
    releases: Option<Vec<Release>>,
}

impl FakeReleases {
    /// `(version, branch_position)` pairs in publication order
    pub fn new(releases: &[(&str, u64)]) -> Self {
        Self {
            releases: Some(
                releases
                    .iter()
                    .map(|(version, position)| Release::new(v(version), Some(*position)))
                    .collect(),
            ),
        }
    }

    pub fn failing() -> Self {
        Self { releases: None }
    }
}

#[async_trait]
impl ReleaseRegistry for FakeReleases {
    async fn fetch_releases(
        &self,
        _platform: Platform,
        _channel: &str,
        _limit: usize,
    ) -> Result<Vec<Release>, RegistryError> {
        self.releases
            .clone()
            .ok_or_else(|| RegistryError::InvalidResponse("unavailable".to_string()))
    }
}

/// Binary locator backed by a branch-position to URL table
#[derive(Default)]
pub struct FakeLocator {
    binaries: HashMap<u64, String>,
    unreachable: Vec<u64>,
    checked: Mutex<Vec<u64>>,
}

impl FakeLocator {
    pub fn with_binary(mut self, branch_position: u64, url: &str) -> Self {
        self.binaries.insert(branch_position, url.to_string());
        self
    }

    pub fn with_unreachable(mut self, branch_position: u64) -> Self {
        self.unreachable.push(branch_position);
        self
    }

    pub fn checked(&self) -> Vec<u64> {
        self.checked.lock().unwrap().clone()
    }
}

#[async_trait]
impl BinaryLocator for FakeLocator {
    async fn branch_position(&self, _version: Version) -> Result<Option<u64>, RegistryError> {
        Ok(None)
    }

    async fn binary_url(
        &self,
        branch_position: u64,
        _platform: Platform,
    ) -> Result<Option<String>, RegistryError> {
        self.checked.lock().unwrap().push(branch_position);
        if self.unreachable.contains(&branch_position) {
            return Err(RegistryError::InvalidResponse("timeout".to_string()));
        }
        Ok(self.binaries.get(&branch_position).cloned())
    }
}

/// Prompt answering from a script and remembering what it was shown
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<String>>>,
    shown: Mutex<Vec<Vec<MappedEntry>>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| Some(a.to_string())).collect()),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn shown(&self) -> Vec<Vec<MappedEntry>> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl SelectionPrompt for ScriptedPrompt {
    async fn select(
        &self,
        candidates: &[MappedEntry],
        _hint: &str,
    ) -> Result<Option<String>, PromptError> {
        self.shown.lock().unwrap().push(candidates.to_vec());
        Ok(self.answers.lock().unwrap().pop_front().flatten())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    infos: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

pub fn create_app(
    releases: FakeReleases,
    locator: Arc<FakeLocator>,
    prompt: Arc<ScriptedPrompt>,
    notifier: Arc<RecordingNotifier>,
) -> App {
    App::new(
        Arc::new(releases),
        locator,
        prompt,
        notifier,
        Downloader::new().quiet(),
    )
}

pub fn base_config(download_folder: &std::path::Path) -> Config {
    Config {
        platform: linux(),
        unzip: false,
        download_folder: download_folder.to_path_buf(),
        ..Config::default()
    }
}
