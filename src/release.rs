//! Supported PLACES releases.
//!
//! Each yearly release of the county dataset is published under its own
//! Socrata dataset id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlacesError;

/// Dataset id of the PLACES measure data dictionary
pub const DATA_DICTIONARY_ID: &str = "m35w-spkz";

/// A dated snapshot of the county-level PLACES dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Release {
    #[serde(rename = "2020")]
    Y2020,
    #[serde(rename = "2021")]
    Y2021,
    #[serde(rename = "2022")]
    Y2022,
    #[serde(rename = "2023")]
    Y2023,
    #[serde(rename = "2024")]
    Y2024,
    #[serde(rename = "2025")]
    Y2025,
}

impl Release {
    /// Every supported release, oldest first
    pub const ALL: [Release; 6] = [
        Release::Y2020,
        Release::Y2021,
        Release::Y2022,
        Release::Y2023,
        Release::Y2024,
        Release::Y2025,
    ];

    /// The most recent release
    pub const LATEST: Release = Release::Y2025;

    /// Socrata dataset id for the county data of this release
    pub fn dataset_id(self) -> &'static str {
        match self {
            Release::Y2020 => "dv4u-3x3q",
            Release::Y2021 => "pqpp-u99h",
            Release::Y2022 => "duw2-7jbt",
            Release::Y2023 => "h3ej-a9ec",
            Release::Y2024 => "fu4u-a9bh",
            Release::Y2025 => "swc5-untb",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Release::Y2020 => "2020",
            Release::Y2021 => "2021",
            Release::Y2022 => "2022",
            Release::Y2023 => "2023",
            Release::Y2024 => "2024",
            Release::Y2025 => "2025",
        }
    }
}

impl Default for Release {
    fn default() -> Self {
        Release::LATEST
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Release {
    type Err = PlacesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Release::ALL
            .into_iter()
            .find(|release| release.as_str() == trimmed)
            .ok_or_else(|| {
                PlacesError::invalid_parameter(
                    "release",
                    format!(
                        "release {:?} is not supported; expected one of 2020-2025",
                        s
                    ),
                )
            })
    }
}
