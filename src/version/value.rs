//! Four-component Chromium version (`major.minor.branch.patch`)
//!
//! Parsing is permissive: a missing or non-numeric component becomes `0`,
//! so `"10.a.1"` is `10.0.1.0`. The dotted rendering is the canonical form
//! and round-trips through [`Version::parse`].

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::version::error::VersionError;

/// An immutable Chromium version
///
/// Ordering is lexicographic over (major, minor, branch, patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Version {
    major: u32,
    minor: u32,
    branch: u32,
    patch: u32,
}

/// Record form of a version, every component optional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct VersionRecord {
    pub major: Option<u32>,
    pub minor: Option<u32>,
    pub branch: Option<u32>,
    pub patch: Option<u32>,
}

impl Version {
    /// Highest value a single component can hold
    pub const COMPONENT_MAX: u32 = u32::MAX;

    /// Builds a version from its four positional components
    pub const fn from_parts(major: u32, minor: u32, branch: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            branch,
            patch,
        }
    }

    /// Builds a version from a record, absent components are `0`
    pub fn from_record(record: VersionRecord) -> Self {
        Self::from_parts(
            record.major.unwrap_or(0),
            record.minor.unwrap_or(0),
            record.branch.unwrap_or(0),
            record.patch.unwrap_or(0),
        )
    }

    /// Parses a dotted version string; never fails
    ///
    /// Examples:
    /// - "119.0.6045.105" -> 119.0.6045.105
    /// - "119" -> 119.0.0.0
    /// - "10.a.1" -> 10.0.1.0
    pub fn parse(input: &str) -> Self {
        Self::parse_with_fill(input, 0)
    }

    /// Parses a dotted version string, filling components that are not
    /// present at all with `fill`
    ///
    /// Components that are present but not numeric still become `0`.
    /// Used for upper bounds, where `"120"` should cover every `120.x` build.
    pub fn parse_with_fill(input: &str, fill: u32) -> Self {
        let mut parts = input.trim().split('.');
        let mut next = || {
            parts
                .next()
                .map(|part| part.trim().parse::<u32>().unwrap_or(0))
                .unwrap_or(fill)
        };
        let major = next();
        let minor = next();
        let branch = next();
        let patch = next();
        Self::from_parts(major, minor, branch, patch)
    }

    /// Builds a version from an untyped JSON value
    ///
    /// Accepts a dotted string, a number (taken as the major component),
    /// an array of up to four positional components, or a
    /// `{major, minor, branch, patch}` object. Any other shape is an
    /// [`VersionError::InvalidInput`].
    pub fn from_json(value: &Value) -> Result<Self, VersionError> {
        match value {
            Value::String(s) => Ok(Self::parse(s)),
            Value::Number(_) => Ok(Self::from_parts(component_from_value(value), 0, 0, 0)),
            Value::Array(items) => {
                let component = |i: usize| items.get(i).map(component_from_value).unwrap_or(0);
                Ok(Self::from_parts(
                    component(0),
                    component(1),
                    component(2),
                    component(3),
                ))
            }
            Value::Object(map) => {
                let component =
                    |key: &str| map.get(key).map(component_from_value).unwrap_or(0);
                Ok(Self::from_parts(
                    component("major"),
                    component("minor"),
                    component("branch"),
                    component("patch"),
                ))
            }
            Value::Null | Value::Bool(_) => Err(VersionError::InvalidInput(value.to_string())),
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn branch(&self) -> u32 {
        self.branch
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    /// Three-way comparison, identical to [`Ord::cmp`]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

fn component_from_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.branch, self.patch
        )
    }
}

impl FromStr for Version {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<VersionRecord> for Version {
    fn from(record: VersionRecord) -> Self {
        Self::from_record(record)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}
