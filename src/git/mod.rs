//! Source control abstraction layer
//!
//! The release workflow only needs a narrow slice of git: resolve HEAD,
//! commit the version bump, create a tag and push it. [`SourceControl`]
//! captures that slice so the workflow can run against either
//!
//! - [`repository::Git2Repository`]: the working checkout, through `git2`
//! - [`mock::MockRepository`]: an in-memory fake for tests
//!
//! ```rust
//! # use release_coordinator::git::{Identity, SourceControl};
//! # fn example<S: SourceControl>(scm: &S) -> release_coordinator::Result<()> {
//! let identity = Identity::new("RuffleBuild", "ruffle@ruffle.rs");
//! let commit = scm.commit_all("Release 1.2.1", &identity)?;
//! scm.create_tag("v1.2.1", &commit)?;
//! scm.push_tag("origin", "v1.2.1")?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Author and committer identity for release commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Identity {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Source control operations used by the release workflow.
///
/// Commit ids are exchanged as full hex strings.
pub trait SourceControl {
    /// Full id of the commit HEAD points at
    fn head_commit(&self) -> Result<String>;

    /// Commit every modified tracked file (like `git commit -a`) on top of HEAD.
    ///
    /// Fails when there is nothing to commit.
    ///
    /// # Returns
    /// * `Ok(String)` - Id of the new commit
    fn commit_all(&self, message: &str, identity: &Identity) -> Result<String>;

    /// Create a lightweight tag at `target`.
    ///
    /// Fails if the tag already exists; tags are never moved.
    fn create_tag(&self, name: &str, target: &str) -> Result<()>;

    /// Push a single tag to a remote
    fn push_tag(&self, remote: &str, name: &str) -> Result<()>;
}
