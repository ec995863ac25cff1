use crate::error::{ReleaseError, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Pre-release qualifier attached to a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifier {
    /// `nightly.{year}.{month}.{day}`, the date the build was cut.
    Nightly(NaiveDate),
    /// Any other pre-release string found in a manifest (e.g. `alpha.1`).
    Other(String),
}

impl Qualifier {
    fn parse(pre: &str) -> Self {
        static NIGHTLY: OnceLock<Option<Regex>> = OnceLock::new();
        let re = NIGHTLY
            .get_or_init(|| Regex::new(r"^nightly\.(\d{4})\.(\d{1,2})\.(\d{1,2})$").ok());

        re.as_ref()
            .and_then(|re| re.captures(pre))
            .and_then(|caps| {
                let year = caps[1].parse().ok()?;
                let month = caps[2].parse().ok()?;
                let day = caps[3].parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)
            })
            .map(Qualifier::Nightly)
            .unwrap_or_else(|| Qualifier::Other(pre.to_string()))
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualifier::Nightly(date) => write!(
                f,
                "nightly.{}.{}.{}",
                date.year(),
                date.month(),
                date.day()
            ),
            Qualifier::Other(pre) => f.write_str(pre),
        }
    }
}

/// Authoritative release version: `major.minor.patch[-qualifier]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub qualifier: Option<Qualifier>,
}

impl Version {
    /// Create a new version without a qualifier
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            qualifier: None,
        }
    }

    /// Parse the string a version manifest reports (e.g. "1.3.0-nightly.2024.3.5").
    ///
    /// Build metadata (`+...`) is accepted and dropped.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let parsed = semver::Version::parse(trimmed).map_err(|e| {
            ReleaseError::parse(format!("Invalid version '{}': {}", trimmed, e))
        })?;

        let qualifier = if parsed.pre.is_empty() {
            None
        } else {
            Some(Qualifier::parse(parsed.pre.as_str()))
        };

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            qualifier,
        })
    }

    /// Bump one component, zeroing everything less significant and dropping
    /// any qualifier.
    pub fn bump(&self, level: BumpLevel) -> Self {
        match level {
            BumpLevel::Major => Version::new(self.major + 1, 0, 0),
            BumpLevel::Minor => Version::new(self.major, self.minor + 1, 0),
            BumpLevel::Patch => Version::new(self.major, self.minor, self.patch + 1),
        }
    }

    /// This version's numeric core qualified as the nightly of `date`.
    pub fn with_nightly(&self, date: NaiveDate) -> Self {
        Version {
            qualifier: Some(Qualifier::Nightly(date)),
            ..self.release_core()
        }
    }

    /// The `major.minor.patch` part without any qualifier.
    pub fn release_core(&self) -> Self {
        Version::new(self.major, self.minor, self.patch)
    }

    pub fn is_nightly(&self) -> bool {
        self.nightly_date().is_some()
    }

    /// Date of the nightly this version was cut as
    pub fn nightly_date(&self) -> Option<NaiveDate> {
        match self.qualifier {
            Some(Qualifier::Nightly(date)) => Some(date),
            _ => None,
        }
    }

    fn as_semver(&self) -> semver::Version {
        let pre = self
            .qualifier
            .as_ref()
            .and_then(|q| semver::Prerelease::new(&q.to_string()).ok())
            .unwrap_or(semver::Prerelease::EMPTY);
        semver::Version {
            major: self.major,
            minor: self.minor,
            patch: self.patch,
            pre,
            build: semver::BuildMetadata::EMPTY,
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Semantic-versioning precedence: a qualified version sorts before its core.
impl Ord for Version {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_semver().cmp_precedence(&other.as_semver())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, "-{}", qualifier)?;
        }
        Ok(())
    }
}

/// Semantic version component to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpLevel {
    Major,
    Minor,
    Patch,
}

impl BumpLevel {
    /// Argument spelling used by version-manifest tools.
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpLevel::Major => "major",
            BumpLevel::Minor => "minor",
            BumpLevel::Patch => "patch",
        }
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
