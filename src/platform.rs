//! Operating system and CPU architecture types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Operating system a build targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Win,
    Mac,
}

impl Os {
    /// Returns the string representation of the operating system
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Win => "win",
            Os::Mac => "mac",
        }
    }

    /// Platform name used by the release dashboard
    pub fn dashboard_name(&self) -> &'static str {
        match self {
            Os::Linux => "Linux",
            Os::Win => "Windows",
            Os::Mac => "Mac",
        }
    }

    /// Operating system of the running process, if it is one we ship builds for
    pub fn host() -> Option<Self> {
        match std::env::consts::OS {
            "linux" => Some(Os::Linux),
            "windows" => Some(Os::Win),
            "macos" => Some(Os::Mac),
            _ => None,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Os::Linux),
            "win" | "windows" => Ok(Os::Win),
            "mac" | "macos" | "darwin" => Ok(Os::Mac),
            other => Err(format!("unknown operating system: {other}")),
        }
    }
}

/// CPU architecture a build targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X64,
    X86,
    Arm,
}

impl Arch {
    /// Returns the string representation of the architecture
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::X86 => "x86",
            Arch::Arm => "arm",
        }
    }

    pub fn host() -> Option<Self> {
        match std::env::consts::ARCH {
            "x86_64" => Some(Arch::X64),
            "x86" => Some(Arch::X86),
            "aarch64" | "arm" => Some(Arch::Arm),
            _ => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Ok(Arch::X64),
            "x86" | "i386" | "i686" => Ok(Arch::X86),
            "arm" | "arm64" | "aarch64" => Ok(Arch::Arm),
            other => Err(format!("unknown architecture: {other}")),
        }
    }
}

/// An OS/architecture pair outside the six supported combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported os/arch combination: {os}/{arch}")]
pub struct UnsupportedCombination {
    pub os: Os,
    pub arch: Arch,
}

/// A validated OS/architecture pair
///
/// Supported combinations:
/// - linux: x64, x86
/// - win: x64, x86
/// - mac: x64, arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    os: Os,
    arch: Arch,
}

impl Platform {
    pub fn new(os: Os, arch: Arch) -> Result<Self, UnsupportedCombination> {
        match (os, arch) {
            (Os::Linux | Os::Win, Arch::X64 | Arch::X86) | (Os::Mac, Arch::X64 | Arch::Arm) => {
                Ok(Self { os, arch })
            }
            _ => Err(UnsupportedCombination { os, arch }),
        }
    }

    /// Platform of the running process, falling back to linux/x64
    pub fn host() -> Self {
        let os = Os::host().unwrap_or(Os::Linux);
        let arch = Arch::host().unwrap_or(Arch::X64);
        // x64 is valid for every supported os
        Self::new(os, arch).unwrap_or(Self { os, arch: Arch::X64 })
    }

    pub fn os(&self) -> Os {
        self.os
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    /// Directory prefix of this platform in the snapshot bucket
    pub fn snapshot_segment(&self) -> &'static str {
        match (self.os, self.arch) {
            (Os::Linux, Arch::X86) => "Linux",
            (Os::Linux, _) => "Linux_x64",
            (Os::Win, Arch::X86) => "Win",
            (Os::Win, _) => "Win_x64",
            (Os::Mac, Arch::Arm) => "Mac_Arm",
            (Os::Mac, _) => "Mac",
        }
    }

    /// Archive name (without extension) of a snapshot build
    pub fn snapshot_filename(&self) -> &'static str {
        match self.os {
            Os::Linux => "chrome-linux",
            Os::Win => "chrome-win",
            Os::Mac => "chrome-mac",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
