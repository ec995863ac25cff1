use crate::domain::channel::ReleaseChannel;
use crate::domain::version::Version;
use chrono::NaiveDate;

/// A tag created for a release. Never moved once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
    pub channel: ReleaseChannel,
    /// Commit id the tag points at
    pub target: String,
}

/// Naming rules for tags, release titles and package filenames.
///
/// Nightlies are named after their date, stable releases after their version:
///
/// | channel | tag                  | title                | package prefix              |
/// |---------|----------------------|----------------------|-----------------------------|
/// | nightly | `nightly-2024-03-05` | `Nightly 2024-03-05` | `ruffle-nightly-2024_03_05` |
/// | stable  | `v1.2.3`             | `Release 1.2.3`      | `ruffle-1.2.3`              |
#[derive(Debug, Clone)]
pub struct ReleaseNaming {
    pub project_name: String,
    pub nightly_prefix: String,
}

impl ReleaseNaming {
    pub fn new(project_name: impl Into<String>, nightly_prefix: impl Into<String>) -> Self {
        ReleaseNaming {
            project_name: project_name.into(),
            nightly_prefix: nightly_prefix.into(),
        }
    }

    pub fn nightly_tag(&self, date: NaiveDate) -> String {
        format!("{}{}", self.nightly_prefix, date.format("%Y-%m-%d"))
    }

    pub fn stable_tag(&self, version: &Version) -> String {
        format!("v{}", version)
    }

    pub fn nightly_title(&self, date: NaiveDate) -> String {
        format!("Nightly {}", date.format("%Y-%m-%d"))
    }

    pub fn stable_title(&self, version: &Version) -> String {
        format!("Release {}", version)
    }

    pub fn nightly_package_prefix(&self, date: NaiveDate) -> String {
        format!("{}-nightly-{}", self.project_name, date.format("%Y_%m_%d"))
    }

    pub fn stable_package_prefix(&self, version: &Version) -> String {
        format!("{}-{}", self.project_name, version)
    }
}

impl Default for ReleaseNaming {
    fn default() -> Self {
        ReleaseNaming::new("ruffle", "nightly-")
    }
}
