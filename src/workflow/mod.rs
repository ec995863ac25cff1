//! Release workflow
//!
//! Steps run strictly in sequence and stop at the first failure:
//!
//! 1. `bump` - [`oracle::VersionOracle`] moves the authoritative version
//! 2. `sync` - [`sync::synchronize`] mirrors it into the web manifest
//! 3. `metainfo` - stable releases prepend an entry to the metadata ledger
//! 4. `commit` - the bump is committed with the build identity
//! 5. `tag-and-push`, `release` - [`publisher::Publisher`] tags and publishes,
//!    anchoring nightly notes with [`locator::NightlyTagLocator`]
//!
//! Each step can also be run on its own; errors carry the step name.

pub mod locator;
pub mod oracle;
pub mod publisher;
pub mod sync;

use crate::config::Config;
use crate::domain::{
    BumpChannel, ReleaseChannel, ReleaseNaming, ReleaseTag, Version, VersionIdentifierSet,
};
use crate::error::{Result, StepContext};
use crate::git::{Identity, SourceControl};
use crate::hosting::{ReleaseHost, ReleaseRequest};
use crate::manifest::{VersionStore, WebManifest};
use crate::metainfo::{self, LedgerEntry};
use crate::output::{self, OutputSink};
use chrono::NaiveDate;
use oracle::VersionOracle;
use publisher::{Publisher, ReleasePlan};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// External capabilities the workflow drives
#[derive(Clone, Copy)]
pub struct Tools<'a> {
    pub versions: &'a dyn VersionStore,
    pub web: &'a dyn WebManifest,
    pub scm: &'a dyn SourceControl,
    pub host: &'a dyn ReleaseHost,
}

/// Outcome of a full `release` step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRelease {
    pub plan: ReleasePlan,
    pub request: ReleaseRequest,
}

/// Outcome of the whole pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    pub identifiers: VersionIdentifierSet,
    pub ledger_entry: Option<LedgerEntry>,
    pub commit: String,
    pub tag: ReleaseTag,
    pub release: ReleaseRequest,
}

/// Runs workflow steps against one checkout on one release date.
pub struct Coordinator<'a> {
    config: &'a Config,
    tools: Tools<'a>,
    today: NaiveDate,
    root: PathBuf,
}

impl<'a> Coordinator<'a> {
    pub fn new(config: &'a Config, tools: Tools<'a>, today: NaiveDate) -> Self {
        Coordinator {
            config,
            tools,
            today,
            root: PathBuf::from("."),
        }
    }

    /// Resolve relative paths (such as the metainfo file) against `root`
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn naming(&self) -> ReleaseNaming {
        self.config.naming()
    }

    fn oracle(&self) -> VersionOracle<'a> {
        VersionOracle::new(self.tools.versions)
    }

    fn publisher(&self) -> Publisher<'a> {
        Publisher {
            scm: self.tools.scm,
            host: self.tools.host,
            remote: &self.config.git.remote,
            nightly_prefix: &self.config.release.nightly_prefix,
            nightly_lookback: self.config.release.nightly_lookback,
        }
    }

    /// The authoritative version
    pub fn current_version(&self) -> Result<Version> {
        self.oracle().get().step("version")
    }

    /// Channel the authoritative version belongs to: nightly if it carries a
    /// nightly qualifier, stable otherwise
    pub fn inferred_channel(&self) -> Result<ReleaseChannel> {
        let version = self.current_version()?;
        Ok(if version.is_nightly() {
            ReleaseChannel::Nightly
        } else {
            ReleaseChannel::Stable
        })
    }

    /// Bump the version and emit `current-version`, `version` and `version4`.
    pub fn bump(
        &self,
        channel: BumpChannel,
        sink: &mut dyn OutputSink,
    ) -> Result<VersionIdentifierSet> {
        let ids = self
            .oracle()
            .bump(channel, self.today, &self.naming())
            .step("bump")?;

        emit_bump_outputs(&ids, sink).step("bump")?;
        Ok(ids)
    }

    /// Mirror the authoritative version into the web manifest
    pub fn sync(&self) -> Result<Version> {
        let version = self.oracle().get().step("sync")?;
        sync::synchronize(self.tools.web, &version).step("sync")?;
        Ok(version)
    }

    /// Prepend a ledger entry for `version` (default: the authoritative
    /// version) to the metainfo file at `path` (default: configured path).
    ///
    /// Not deduplicated: call once per stable release.
    pub fn update_metainfo(
        &self,
        version: Option<&Version>,
        path: Option<&Path>,
    ) -> Result<LedgerEntry> {
        let version = match version {
            Some(version) => version.clone(),
            None => self.oracle().get().step("metainfo")?,
        };
        if version.is_nightly() {
            warn!(%version, "recording a nightly version in the release ledger");
        }

        let tag = self.naming().stable_tag(&version);
        let entry = LedgerEntry {
            version: version.to_string(),
            date: self.today,
            url: self.config.release_url(&tag),
        };
        let path = self
            .root
            .join(path.unwrap_or(self.config.metainfo.path.as_path()));

        metainfo::insert_release(&path, &entry).step("metainfo")?;
        info!(path = %path.display(), version = %entry.version, "updated release ledger");
        Ok(entry)
    }

    /// Commit the bumped manifests as `Release {version}`
    pub fn commit(&self) -> Result<String> {
        let version = self.oracle().get().step("commit")?;
        let identity = Identity::new(&self.config.git.author_name, &self.config.git.author_email);
        let message = format!("Release {}", version);
        let id = self
            .tools
            .scm
            .commit_all(&message, &identity)
            .step("commit")?;
        info!(commit = %id, %message, "committed release");
        Ok(id)
    }

    /// Nightlies are named after the date in their qualifier, so a release
    /// cut after midnight still matches the bump it belongs to.
    fn plan(&self, channel: ReleaseChannel, step: &'static str) -> Result<ReleasePlan> {
        let version = self.oracle().get().step(step)?;
        let date = match (channel, version.nightly_date()) {
            (ReleaseChannel::Nightly, Some(date)) => date,
            _ => self.today,
        };
        Ok(ReleasePlan::new(channel, &version, date, &self.naming()))
    }

    /// Tag HEAD for `channel` and push the tag; emits `tag_name`.
    pub fn tag_and_push(
        &self,
        channel: ReleaseChannel,
        sink: &mut dyn OutputSink,
    ) -> Result<ReleaseTag> {
        let plan = self.plan(channel, "tag-and-push")?;
        let tag = self.publisher().tag_and_push(&plan).step("tag-and-push")?;
        sink.emit(output::TAG_NAME, &tag.name).step("tag-and-push")?;
        Ok(tag)
    }

    /// Create the hosted release for the already pushed tag; emits
    /// `tag_name` and `package_prefix`.
    pub fn release(
        &self,
        channel: ReleaseChannel,
        sink: &mut dyn OutputSink,
    ) -> Result<PublishedRelease> {
        let plan = self.plan(channel, "release")?;
        let request = self.publisher().create_release(&plan).step("release")?;
        emit_release_outputs(&plan, sink).step("release")?;
        Ok(PublishedRelease { plan, request })
    }

    /// Run every step for `channel`, stopping at the first failure.
    pub fn pipeline(
        &self,
        channel: BumpChannel,
        sink: &mut dyn OutputSink,
    ) -> Result<PipelineResult> {
        let identifiers = self.bump(channel, sink)?;
        self.sync()?;

        let ledger_entry = match channel.release_channel() {
            ReleaseChannel::Stable => Some(self.update_metainfo(Some(&identifiers.version), None)?),
            ReleaseChannel::Nightly => None,
        };

        let commit = self.commit()?;

        let plan = ReleasePlan::new(
            identifiers.channel,
            &identifiers.version,
            self.today,
            &self.naming(),
        );
        let publisher = self.publisher();
        let tag = publisher.tag_and_push(&plan).step("tag-and-push")?;
        let release = publisher.create_release(&plan).step("release")?;
        emit_release_outputs(&plan, sink).step("release")?;

        Ok(PipelineResult {
            identifiers,
            ledger_entry,
            commit,
            tag,
            release,
        })
    }
}

fn emit_bump_outputs(ids: &VersionIdentifierSet, sink: &mut dyn OutputSink) -> Result<()> {
    sink.emit(output::CURRENT_VERSION, &ids.current.to_string())?;
    sink.emit(output::VERSION, &ids.version.to_string())?;
    sink.emit(output::VERSION4, &ids.version4)
}

fn emit_release_outputs(plan: &ReleasePlan, sink: &mut dyn OutputSink) -> Result<()> {
    sink.emit(output::TAG_NAME, &plan.tag_name)?;
    sink.emit(output::PACKAGE_PREFIX, &plan.package_prefix)
}
