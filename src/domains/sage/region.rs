//! Region and API version resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host serving every supported region.
pub const API_HOST: &str = "https://api.accounting.sage.com";

/// Default API version segment.
pub const DEFAULT_API_VERSION: &str = "v3.1";

/// Sage Business Cloud Accounting regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Uk,
    Us,
    Ca,
    De,
    Es,
    Fr,
    Ie,
}

impl Region {
    /// All supported regions.
    pub const ALL: [Region; 7] = [
        Region::Uk,
        Region::Us,
        Region::Ca,
        Region::De,
        Region::Es,
        Region::Fr,
        Region::Ie,
    ];

    /// Two-letter region code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Uk => "uk",
            Self::Us => "us",
            Self::Ca => "ca",
            Self::De => "de",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::Ie => "ie",
        }
    }

    /// API host for this region.
    pub fn host(self) -> &'static str {
        // Sage routes every region through one host today.
        API_HOST
    }

    /// Base URL for this region and API version, without a trailing slash.
    pub fn base_url(self, api_version: &str) -> String {
        format!("{}/{}", self.host(), api_version.trim_matches('/'))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or_else(|| {
                format!(
                    "Unknown region '{}'. Expected one of: uk, us, ca, de, es, fr, ie",
                    s
                )
            })
    }
}
