// Copyright 2019-2020 PolkaX. Licensed under MIT or Apache-2.0.

use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Release tag of a version, a pre-release orders below the final release.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Release {
    Pre(String),
    Final,
}

/// `major[.minor[.patch]][-tag]` as reported by the server.
///
/// A missing component orders below any present one, so "4" < "4.0" <
/// "4.0.0", and "4.0.0-rc1" < "4.0.0".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: Option<u32>,
    pub patch: Option<u32>,
    pub release: Release,
}

/// First server version offering `UNLINK`.
pub const UNLINK_MIN_VERSION: ServerVersion = ServerVersion::new(4, 0, 0);

impl ServerVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        ServerVersion {
            major,
            minor: Some(minor),
            patch: Some(patch),
            release: Release::Final,
        }
    }
}

impl FromStr for ServerVersion {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StoreError::InvalidVersion(s.to_string());
        let s = s.trim();
        let end = s
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(s.len());
        let (numbers, tag) = s.split_at(end);

        let mut parts = numbers
            .split('.')
            .map(|p| p.parse::<u32>().map_err(|_| invalid()));
        let major = parts.next().ok_or_else(invalid)??;
        let minor = parts.next().transpose()?;
        let patch = parts.next().transpose()?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        let tag = tag.trim_start_matches(|c: char| c == '-' || c == '+' || c == '_');
        let release = if tag.is_empty() {
            Release::Final
        } else {
            Release::Pre(tag.to_string())
        };
        Ok(ServerVersion {
            major,
            minor,
            patch,
            release,
        })
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        for part in self.minor.iter().chain(self.patch.iter()) {
            write!(f, ".{}", part)?;
        }
        if let Release::Pre(tag) = &self.release {
            write!(f, "-{}", tag)?;
        }
        Ok(())
    }
}
