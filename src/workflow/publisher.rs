use crate::domain::{ReleaseChannel, ReleaseNaming, ReleaseTag, Version};
use crate::error::Result;
use crate::git::SourceControl;
use crate::hosting::{ReleaseHost, ReleaseRequest};
use crate::workflow::locator::NightlyTagLocator;
use chrono::NaiveDate;
use tracing::info;

/// Names and flags of a release about to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub channel: ReleaseChannel,
    pub tag_name: String,
    pub title: String,
    /// Filename prefix for the artifacts uploaded to this release
    pub package_prefix: String,
}

impl ReleasePlan {
    /// Nightlies are named after `date`, stable releases after `version`.
    pub fn new(
        channel: ReleaseChannel,
        version: &Version,
        date: NaiveDate,
        naming: &ReleaseNaming,
    ) -> Self {
        match channel {
            ReleaseChannel::Nightly => ReleasePlan {
                channel,
                tag_name: naming.nightly_tag(date),
                title: naming.nightly_title(date),
                package_prefix: naming.nightly_package_prefix(date),
            },
            ReleaseChannel::Stable => ReleasePlan {
                channel,
                tag_name: naming.stable_tag(version),
                title: naming.stable_title(version),
                package_prefix: naming.stable_package_prefix(version),
            },
        }
    }
}

/// Tags the release commit and creates the hosted release for it.
///
/// The tag is always created locally and pushed before the release object,
/// which then refers to the pushed tag (`gh release create --verify-tag`).
pub struct Publisher<'a> {
    pub scm: &'a dyn SourceControl,
    pub host: &'a dyn ReleaseHost,
    pub remote: &'a str,
    pub nightly_prefix: &'a str,
    pub nightly_lookback: usize,
}

impl Publisher<'_> {
    /// Tag HEAD with the plan's tag and push it
    pub fn tag_and_push(&self, plan: &ReleasePlan) -> Result<ReleaseTag> {
        let target = self.scm.head_commit()?;
        self.scm.create_tag(&plan.tag_name, &target)?;
        info!(tag = %plan.tag_name, %target, "created tag");

        self.scm.push_tag(self.remote, &plan.tag_name)?;
        info!(tag = %plan.tag_name, remote = self.remote, "pushed tag");

        Ok(ReleaseTag {
            name: plan.tag_name.clone(),
            channel: plan.channel,
            target,
        })
    }

    /// Create the hosted release for an already pushed tag.
    ///
    /// Nightly notes start at the previous nightly, when one is found;
    /// stable notes cover everything since the previous release.
    pub fn create_release(&self, plan: &ReleasePlan) -> Result<ReleaseRequest> {
        let notes_start_tag = match plan.channel {
            ReleaseChannel::Nightly => {
                NightlyTagLocator::new(self.host, self.nightly_prefix, self.nightly_lookback)
                    .find_previous(&plan.tag_name)?
            }
            ReleaseChannel::Stable => None,
        };

        let request = ReleaseRequest {
            tag: plan.tag_name.clone(),
            title: plan.title.clone(),
            prerelease: plan.channel == ReleaseChannel::Nightly,
            notes_start_tag,
        };
        self.host.create_release(&request)?;
        info!(tag = %request.tag, anchor = ?request.notes_start_tag, "created release");
        Ok(request)
    }
}
