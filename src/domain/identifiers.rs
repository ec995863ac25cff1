use crate::domain::channel::ReleaseChannel;
use crate::domain::tag::ReleaseNaming;
use crate::domain::version::Version;
use crate::error::{ReleaseError, Result};
use chrono::NaiveDate;

/// Every representation of a release version that later stages consume.
///
/// Always derived from the authoritative version after a bump, never edited by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionIdentifierSet {
    /// Version found in the manifest before the bump
    pub current: Version,
    /// Authoritative version after the bump
    pub version: Version,
    /// Strictly numeric `a.b.c.d` form for platforms rejecting pre-release qualifiers
    pub version4: String,
    pub tag_name: String,
    pub package_prefix: String,
    pub channel: ReleaseChannel,
}

impl VersionIdentifierSet {
    /// Fails with a parse error when a `version4` component does not fit in
    /// 16 bits.
    pub fn derive(
        current: &Version,
        version: &Version,
        channel: ReleaseChannel,
        date: NaiveDate,
        naming: &ReleaseNaming,
    ) -> Result<Self> {
        let (version4, tag_name, package_prefix) = match channel {
            ReleaseChannel::Nightly => (
                version4(current, day_id(date))?,
                naming.nightly_tag(date),
                naming.nightly_package_prefix(date),
            ),
            ReleaseChannel::Stable => (
                version4(version, 0)?,
                naming.stable_tag(version),
                naming.stable_package_prefix(version),
            ),
        };

        Ok(VersionIdentifierSet {
            current: current.clone(),
            version: version.clone(),
            version4,
            tag_name,
            package_prefix,
            channel,
        })
    }
}

/// `{major}.{minor}.{patch}.{build}`, each component in `0..=65535`
fn version4(core: &Version, build: i64) -> Result<String> {
    let parts = [
        u16::try_from(core.major),
        u16::try_from(core.minor),
        u16::try_from(core.patch),
        u16::try_from(build),
    ];
    match parts {
        [Ok(major), Ok(minor), Ok(patch), Ok(build)] => {
            Ok(format!("{}.{}.{}.{}", major, minor, patch, build))
        }
        _ => Err(ReleaseError::parse(format!(
            "{}.{}.{}.{} does not fit a four-part numeric version (components must be 0-65535)",
            core.major, core.minor, core.patch, build
        ))),
    }
}

/// Days since 1970-01-01; stays below 65535 (the per-component limit of
/// four-part numeric versions) until the year 2149.
pub fn day_id(date: NaiveDate) -> i64 {
    date.signed_duration_since(NaiveDate::default()).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_fifth() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_day_id() {
        assert_eq!(day_id(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0);
        assert_eq!(day_id(march_fifth()), 19787);
    }

    #[test]
    fn test_nightly_identifiers() {
        let current = Version::new(1, 2, 0);
        let next = Version::new(1, 3, 0).with_nightly(march_fifth());
        let ids = VersionIdentifierSet::derive(
            &current,
            &next,
            ReleaseChannel::Nightly,
            march_fifth(),
            &ReleaseNaming::default(),
        )
        .unwrap();

        assert_eq!(ids.version.to_string(), "1.3.0-nightly.2024.3.5");
        assert_eq!(ids.version4, "1.2.0.19787");
        assert_eq!(ids.tag_name, "nightly-2024-03-05");
        assert_eq!(ids.package_prefix, "ruffle-nightly-2024_03_05");
    }

    #[test]
    fn test_stable_identifiers() {
        let ids = VersionIdentifierSet::derive(
            &Version::new(1, 2, 0),
            &Version::new(1, 2, 1),
            ReleaseChannel::Stable,
            march_fifth(),
            &ReleaseNaming::default(),
        )
        .unwrap();

        assert_eq!(ids.version4, "1.2.1.0");
        assert_eq!(ids.tag_name, "v1.2.1");
        assert_eq!(ids.package_prefix, "ruffle-1.2.1");
    }

    #[test]
    fn test_version4_is_numeric() {
        let current = Version::parse("1.2.0-alpha.3").unwrap();
        let next = Version::new(1, 3, 0).with_nightly(march_fifth());
        let ids = VersionIdentifierSet::derive(
            &current,
            &next,
            ReleaseChannel::Nightly,
            march_fifth(),
            &ReleaseNaming::default(),
        )
        .unwrap();

        let parts: Vec<&str> = ids.version4.split('.').collect();
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all(|p| p.parse::<u16>().is_ok()));
    }

    #[test]
    fn test_oversized_component_rejected() {
        let err = VersionIdentifierSet::derive(
            &Version::new(1, 2, 0),
            &Version::new(1, 2, 70000),
            ReleaseChannel::Stable,
            march_fifth(),
            &ReleaseNaming::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReleaseError::Parse(_)));
        assert!(err.to_string().contains("1.2.70000.0"));
    }

    #[test]
    fn test_largest_component_accepted() {
        let ids = VersionIdentifierSet::derive(
            &Version::new(1, 2, 0),
            &Version::new(65535, 0, 0),
            ReleaseChannel::Stable,
            march_fifth(),
            &ReleaseNaming::default(),
        )
        .unwrap();
        assert_eq!(ids.version4, "65535.0.0.0");
    }

    #[test]
    fn test_nightly_before_epoch_rejected() {
        let result = VersionIdentifierSet::derive(
            &Version::new(1, 2, 0),
            &Version::new(1, 3, 0),
            ReleaseChannel::Nightly,
            NaiveDate::from_ymd_opt(1969, 12, 31).unwrap(),
            &ReleaseNaming::default(),
        );
        assert!(matches!(result, Err(ReleaseError::Parse(_))));
    }
}
