//! Negative-hit store: versions known to have no binary for an os/arch
//!
//! The store is a best-effort cache. A missing or unreadable store file
//! yields an empty store and never an error. Buckets are ordered sets and
//! the serialized key order is fixed (linux, mac, win), so two logically
//! equal stores always serialize to the same bytes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::platform::{Arch, Os, Platform, UnsupportedCombination};
use crate::version::error::StoreError;
use crate::version::value::Version;

/// Trait for recording and querying negative hits
#[cfg_attr(test, automock)]
pub trait NegativeHitStorer: Send {
    /// Check whether a version is known to have no binary on the platform
    fn is_negative_hit(&self, platform: Platform, version: Version) -> Result<bool, StoreError>;

    /// Remember that a version has no binary on the platform
    fn record_negative_hit(
        &mut self,
        platform: Platform,
        version: Version,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
struct IntelBuckets {
    x64: BTreeSet<Version>,
    x86: BTreeSet<Version>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
struct MacBuckets {
    x64: BTreeSet<Version>,
    arm: BTreeSet<Version>,
}

/// In-memory negative-hit store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Store {
    linux: IntelBuckets,
    mac: MacBuckets,
    win: IntelBuckets,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bucket for an os/arch pair
    pub fn bucket(&self, os: Os, arch: Arch) -> Result<&BTreeSet<Version>, UnsupportedCombination> {
        match (os, arch) {
            (Os::Linux, Arch::X64) => Ok(&self.linux.x64),
            (Os::Linux, Arch::X86) => Ok(&self.linux.x86),
            (Os::Win, Arch::X64) => Ok(&self.win.x64),
            (Os::Win, Arch::X86) => Ok(&self.win.x86),
            (Os::Mac, Arch::X64) => Ok(&self.mac.x64),
            (Os::Mac, Arch::Arm) => Ok(&self.mac.arm),
            _ => Err(UnsupportedCombination { os, arch }),
        }
    }

    fn bucket_mut(
        &mut self,
        os: Os,
        arch: Arch,
    ) -> Result<&mut BTreeSet<Version>, UnsupportedCombination> {
        match (os, arch) {
            (Os::Linux, Arch::X64) => Ok(&mut self.linux.x64),
            (Os::Linux, Arch::X86) => Ok(&mut self.linux.x86),
            (Os::Win, Arch::X64) => Ok(&mut self.win.x64),
            (Os::Win, Arch::X86) => Ok(&mut self.win.x86),
            (Os::Mac, Arch::X64) => Ok(&mut self.mac.x64),
            (Os::Mac, Arch::Arm) => Ok(&mut self.mac.arm),
            _ => Err(UnsupportedCombination { os, arch }),
        }
    }

    pub fn has(&self, os: Os, arch: Arch, version: &Version) -> Result<bool, UnsupportedCombination> {
        Ok(self.bucket(os, arch)?.contains(version))
    }

    /// Adds a version to a bucket; adding an existing version is a no-op
    pub fn add(
        &mut self,
        os: Os,
        arch: Arch,
        version: Version,
    ) -> Result<&mut Self, UnsupportedCombination> {
        self.bucket_mut(os, arch)?.insert(version);
        Ok(self)
    }

    /// Per-bucket set union with another store
    pub fn merge(&mut self, other: &Store) -> &mut Self {
        self.linux.x64.extend(&other.linux.x64);
        self.linux.x86.extend(&other.linux.x86);
        self.mac.x64.extend(&other.mac.x64);
        self.mac.arm.extend(&other.mac.arm);
        self.win.x64.extend(&other.win.x64);
        self.win.x86.extend(&other.win.x86);
        self
    }

    /// Total number of entries across all buckets
    pub fn len(&self) -> usize {
        self.linux.x64.len()
            + self.linux.x86.len()
            + self.mac.x64.len()
            + self.mac.arm.len()
            + self.win.x64.len()
            + self.win.x86.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deterministic JSON rendering of the store
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a store, falling back to an empty store on malformed input
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw)
            .inspect_err(|e| warn!("Ignoring malformed negative-hit store: {}", e))
            .unwrap_or_default()
    }

    /// Parses a store strictly, for imports where bad input should be reported
    pub fn try_from_json(raw: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Loads a store from disk; a missing or unreadable file yields an empty store
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                let store = Self::from_json(&raw);
                debug!("Loaded {} negative hits from {:?}", store.len(), path);
                store
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No negative-hit store at {:?}, starting empty", path);
                Self::default()
            }
            Err(e) => {
                warn!("Failed to read negative-hit store {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Overwrites the store file with the current contents
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        debug!("Saved {} negative hits to {:?}", self.len(), path);
        Ok(())
    }
}

impl NegativeHitStorer for Store {
    fn is_negative_hit(&self, platform: Platform, version: Version) -> Result<bool, StoreError> {
        Ok(self.has(platform.os(), platform.arch(), &version)?)
    }

    fn record_negative_hit(
        &mut self,
        platform: Platform,
        version: Version,
    ) -> Result<(), StoreError> {
        self.add(platform.os(), platform.arch(), version)?;
        Ok(())
    }
}

/// A store bound to its file, writing every new negative hit through
pub struct PersistentStore {
    store: Store,
    path: PathBuf,
}

impl PersistentStore {
    pub fn open(path: &Path) -> Self {
        Self {
            store: Store::load(path),
            path: path.to_path_buf(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merges another store in and persists the result
    pub fn import(&mut self, other: &Store) -> Result<usize, StoreError> {
        let before = self.store.len();
        self.store.merge(other);
        self.store.save(&self.path)?;
        let added = self.store.len() - before;
        info!("Imported {} new negative hits into {:?}", added, self.path);
        Ok(added)
    }

    /// Empties the store and persists the empty state
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store = Store::default();
        self.store.save(&self.path)
    }
}

impl NegativeHitStorer for PersistentStore {
    fn is_negative_hit(&self, platform: Platform, version: Version) -> Result<bool, StoreError> {
        self.store.is_negative_hit(platform, version)
    }

    fn record_negative_hit(
        &mut self,
        platform: Platform,
        version: Version,
    ) -> Result<(), StoreError> {
        if self.store.has(platform.os(), platform.arch(), &version)? {
            return Ok(());
        }
        self.store.add(platform.os(), platform.arch(), version)?;
        self.store.save(&self.path)?;
        info!("Recorded negative hit {} for {}", version, platform);
        Ok(())
    }
}
