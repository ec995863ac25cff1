//! Version manifest capabilities
//!
//! The authoritative version lives in a manifest owned by an external tool
//! (cargo for Ruffle); a secondary web-facing manifest mirrors it.
//!
//! - [`VersionStore`]: reads and writes the authoritative version string
//! - [`WebManifest`]: propagates it into the web packages
//!
//! Real implementations shell out ([`cargo::CargoVersionStore`],
//! [`npm::NpmManifest`]); [`mock`] provides in-memory fakes for tests.

pub mod cargo;
pub mod mock;
pub mod npm;

pub use cargo::CargoVersionStore;
pub use mock::{MockVersionStore, MockWebManifest, WebCall};
pub use npm::NpmManifest;

use crate::domain::BumpLevel;
use crate::error::Result;

/// How to change the authoritative version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetVersion {
    /// Let the manifest tool bump one component
    Bump(BumpLevel),
    /// Write this exact string
    Explicit(String),
}

/// Reads and writes the authoritative version string.
///
/// The string is opaque here; parsing belongs to the workflow, so a malformed
/// manifest surfaces as a parse error in the step that reads it.
pub trait VersionStore {
    /// Current version string as reported by the manifest tool
    fn get_version(&self) -> Result<String>;

    /// Rewrite the manifest's version
    fn set_version(&self, change: &SetVersion) -> Result<()>;
}

/// Secondary manifest kept in lock-step with the authoritative version.
pub trait WebManifest {
    /// Install the tooling the other operations need
    fn install(&self) -> Result<()>;

    /// Copy the version string into the manifest
    fn set_version(&self, version: &str) -> Result<()>;

    /// Regenerate build-time artifacts that embed the version
    fn regenerate(&self) -> Result<()>;
}
