//! Domain logic - version arithmetic and naming rules, independent of any tool

pub mod channel;
pub mod identifiers;
pub mod tag;
pub mod version;

pub use channel::{BumpChannel, ReleaseChannel};
pub use identifiers::VersionIdentifierSet;
pub use tag::{ReleaseNaming, ReleaseTag};
pub use version::{BumpLevel, Qualifier, Version};
