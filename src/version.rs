use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of the `--version` output prefix compared against known releases.
const PREFIX_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Version {
    V1_8_1,
    V1_8_2,
    V1_9_0,
    V1_9_1,
    V1_9_2,
    V1_9_7,
    V1_9_8,
    V2_0_0,
    V2_1_1,
}

impl Version {
    pub const ALL: [Version; 9] = [
        Version::V1_8_1,
        Version::V1_8_2,
        Version::V1_9_0,
        Version::V1_9_1,
        Version::V1_9_2,
        Version::V1_9_7,
        Version::V1_9_8,
        Version::V2_0_0,
        Version::V2_1_1,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Version::V1_8_1 => "1.8.1",
            Version::V1_8_2 => "1.8.2",
            Version::V1_9_0 => "1.9.0",
            Version::V1_9_1 => "1.9.1",
            Version::V1_9_2 => "1.9.2",
            Version::V1_9_7 => "1.9.7",
            Version::V1_9_8 => "1.9.8",
            Version::V2_0_0 => "2.0.0",
            Version::V2_1_1 => "2.1.1",
        }
    }

    /// 2.0.0 never shipped a Linux build, so it is only usable when already installed.
    pub fn download_supported(self) -> bool {
        !matches!(self, Version::V2_0_0)
    }

    pub fn from_description(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|version| version.description() == value)
    }

    /// Matches the leading characters of a `--version` report against the known set.
    pub fn from_output(output: &str) -> Option<Self> {
        let prefix = output.get(..PREFIX_LEN)?;
        Self::ALL
            .iter()
            .copied()
            .find(|version| version.canonical_prefix() == prefix)
    }

    fn canonical_prefix(self) -> &'static str {
        let description = self.description();
        description.get(..PREFIX_LEN).unwrap_or(description)
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::V1_9_8
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.description())
    }
}

impl FromStr for Version {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        Self::from_description(trimmed).ok_or_else(|| ConfigError::UnknownVersion(value.to_string()))
    }
}

impl TryFrom<String> for Version {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.description().to_string()
    }
}
