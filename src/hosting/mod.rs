//! Release hosting capability
//!
//! Listing and creating remote release objects. [`gh::GhReleaseHost`] drives
//! the GitHub CLI; [`mock::MockReleaseHost`] keeps releases in memory.

pub mod gh;
pub mod mock;

pub use gh::GhReleaseHost;
pub use mock::MockReleaseHost;

use crate::error::Result;
use serde::Deserialize;

/// One entry of the host's release list, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseRecord {
    #[serde(rename = "tagName")]
    pub tag_name: String,
}

impl ReleaseRecord {
    pub fn new(tag_name: impl Into<String>) -> Self {
        ReleaseRecord {
            tag_name: tag_name.into(),
        }
    }
}

/// Everything needed to create a release for an existing, pushed tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    pub tag: String,
    pub title: String,
    pub prerelease: bool,
    /// Start generated notes at this tag instead of the previous release
    pub notes_start_tag: Option<String>,
}

pub trait ReleaseHost {
    /// Up to `limit` most recent releases, newest first
    fn list_releases(&self, limit: usize) -> Result<Vec<ReleaseRecord>>;

    /// Create a release with auto-generated notes
    fn create_release(&self, request: &ReleaseRequest) -> Result<()>;
}
