use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::platform::Platform;
use crate::version::value::Version;

// =============================================================================
// Network constants
// =============================================================================

/// Timeout for every remote request (30 seconds)
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of releases requested from the release dashboard
pub const RELEASE_FETCH_LIMIT: usize = 1000;

/// Number of candidates offered when no count is configured
pub const DEFAULT_RESULTS: usize = 10;

/// Release channel queried when none is configured
pub const DEFAULT_CHANNEL: &str = "Stable";

const APP_NAME: &str = "chromium-fetcher";

/// What to do when the selected version has no binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnFail {
    /// Ask again
    #[default]
    Nothing,
    /// Move towards the start of the candidate list
    Increase,
    /// Move towards the end of the candidate list
    Decrease,
}

impl FromStr for OnFail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nothing" => Ok(OnFail::Nothing),
            "increase" => Ok(OnFail::Increase),
            "decrease" => Ok(OnFail::Decrease),
            other => Err(format!("unknown on-fail policy: {other}")),
        }
    }
}

/// Run configuration consumed by the filter and the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Inclusive lower bound, `None` is unbounded
    pub min: Option<Version>,
    /// Inclusive upper bound, `None` is unbounded
    pub max: Option<Version>,
    /// Maximum number of candidates (majors with `only_newest_major`)
    pub results: Option<usize>,
    pub platform: Platform,
    pub channel: String,
    pub on_fail: OnFail,
    pub interactive: bool,
    pub only_newest_major: bool,
    pub hide_negative_hits: bool,
    pub inverse: bool,
    /// Exact version to fetch, bypassing filtering and selection
    pub single: Option<Version>,
    /// Persist newly found negative hits
    pub store: bool,
    pub download: bool,
    pub unzip: bool,
    pub download_folder: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            results: Some(DEFAULT_RESULTS),
            platform: Platform::host(),
            channel: DEFAULT_CHANNEL.to_string(),
            on_fail: OnFail::default(),
            interactive: true,
            only_newest_major: false,
            hide_negative_hits: false,
            inverse: false,
            single: None,
            store: true,
            download: true,
            unzip: true,
            download_folder: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Applies the defaults from a settings file
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if let Some(results) = settings.results {
            self.results = Some(results);
        }
        if let Some(on_fail) = settings.on_fail {
            self.on_fail = on_fail;
        }
        if let Some(channel) = &settings.channel {
            self.channel = channel.clone();
        }
        if let Some(store) = settings.store {
            self.store = store;
        }
        if let Some(folder) = &settings.download_folder {
            self.download_folder = folder.clone();
        }
        self
    }
}

/// Optional user settings read from `settings.json` in the data directory
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub results: Option<usize>,
    pub on_fail: Option<OnFail>,
    pub channel: Option<String>,
    pub store: Option<bool>,
    pub download_folder: Option<PathBuf>,
}

impl Settings {
    /// Reads settings from a file; a missing or malformed file yields defaults
    pub fn load(path: &Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| warn!("Ignoring malformed settings file {:?}: {}", path, e))
            .unwrap_or_default()
    }
}

/// Returns the path to the data directory for chromium-fetcher.
/// Uses $XDG_DATA_HOME/chromium-fetcher if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/chromium-fetcher,
/// or ./chromium-fetcher if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the negative-hit store file.
pub fn store_path() -> PathBuf {
    data_dir().join("store.json")
}

/// Returns the path to the settings file.
pub fn settings_path() -> PathBuf {
    data_dir().join("settings.json")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join(format!("{APP_NAME}.log"))
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_NAME)
}
