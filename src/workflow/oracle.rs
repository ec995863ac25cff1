use crate::domain::{BumpChannel, BumpLevel, ReleaseNaming, Version, VersionIdentifierSet};
use crate::error::{ReleaseError, Result};
use crate::manifest::{SetVersion, VersionStore};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Reads and bumps the authoritative version.
pub struct VersionOracle<'a> {
    store: &'a dyn VersionStore,
}

impl<'a> VersionOracle<'a> {
    pub fn new(store: &'a dyn VersionStore) -> Self {
        VersionOracle { store }
    }

    /// Current authoritative version.
    ///
    /// Fails with a tool error if the manifest cannot be read and a parse
    /// error if its version is malformed.
    pub fn get(&self) -> Result<Version> {
        Version::parse(&self.store.get_version()?)
    }

    /// Bump the manifest and derive every identifier of the new version.
    ///
    /// Stable levels delegate to the manifest tool. A nightly bump asks the
    /// tool for the next minor version, restores the manifest, and then writes
    /// `{next minor}-nightly.{y}.{m}.{d}`, so every nightly cut from the same
    /// checkout on the same day plans the same version. A manifest that already
    /// carries a nightly qualifier is refused before anything is written.
    pub fn bump(
        &self,
        channel: BumpChannel,
        date: NaiveDate,
        naming: &ReleaseNaming,
    ) -> Result<VersionIdentifierSet> {
        let current_text = self.store.get_version()?;
        let current = Version::parse(&current_text)?;
        info!(%current, %channel, "bumping version");

        if channel == BumpChannel::Nightly && current.is_nightly() {
            return Err(ReleaseError::parse(format!(
                "manifest is already at nightly {}; nightly bumps start from a released version",
                current
            )));
        }

        match channel {
            BumpChannel::Nightly => {
                self.store
                    .set_version(&SetVersion::Bump(BumpLevel::Minor))?;
                let planned = self.get()?;
                debug!(%planned, "planned next version, restoring manifest");
                self.store
                    .set_version(&SetVersion::Explicit(current_text.trim().to_string()))?;
                let nightly = planned.with_nightly(date);
                self.store
                    .set_version(&SetVersion::Explicit(nightly.to_string()))?;
            }
            BumpChannel::Stable(level) => {
                self.store.set_version(&SetVersion::Bump(level))?;
            }
        }

        let version = self.get()?;
        if version <= current {
            return Err(ReleaseError::parse(format!(
                "manifest version went from {} to {} on a {} bump",
                current, version, channel
            )));
        }
        info!(%version, "version bumped");

        VersionIdentifierSet::derive(
            &current,
            &version,
            channel.release_channel(),
            date,
            naming,
        )
    }
}
