//! Release records and the candidate entries mapped from them

use serde::Deserialize;

use crate::version::value::Version;

/// A release record as published by the release dashboard
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub version: Version,
    #[serde(rename = "chromium_main_branch_position", default)]
    pub branch_position: Option<u64>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

impl Release {
    pub fn new(version: Version, branch_position: Option<u64>) -> Self {
        Self {
            version,
            branch_position,
            channel: None,
            platform: None,
        }
    }
}

/// An unfiltered item of the available-version list
///
/// Either a bare dotted version string or a full release record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRelease {
    Version(String),
    Release(Release),
}

impl RawRelease {
    pub fn version(&self) -> Version {
        match self {
            RawRelease::Version(s) => Version::parse(s),
            RawRelease::Release(release) => release.version,
        }
    }

    pub fn branch_position(&self) -> Option<u64> {
        match self {
            RawRelease::Version(_) => None,
            RawRelease::Release(release) => release.branch_position,
        }
    }
}

impl From<&str> for RawRelease {
    fn from(version: &str) -> Self {
        RawRelease::Version(version.to_string())
    }
}

impl From<String> for RawRelease {
    fn from(version: String) -> Self {
        RawRelease::Version(version)
    }
}

impl From<Release> for RawRelease {
    fn from(release: Release) -> Self {
        RawRelease::Release(release)
    }
}

/// A selectable candidate: a version plus its disabled flag
///
/// `disabled` only ever goes from `false` to `true`, through
/// [`MappedEntry::mark_disabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedEntry {
    version: Version,
    disabled: bool,
    branch_position: Option<u64>,
}

impl MappedEntry {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            disabled: false,
            branch_position: None,
        }
    }

    pub fn with_branch_position(self, branch_position: Option<u64>) -> Self {
        Self {
            branch_position,
            ..self
        }
    }

    pub fn with_disabled(self, disabled: bool) -> Self {
        Self {
            disabled: self.disabled || disabled,
            ..self
        }
    }

    /// Returns the disabled copy of this entry
    #[must_use]
    pub fn mark_disabled(self) -> Self {
        Self {
            disabled: true,
            ..self
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn branch_position(&self) -> Option<u64> {
        self.branch_position
    }
}
