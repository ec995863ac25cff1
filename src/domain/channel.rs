use crate::domain::version::BumpLevel;
use std::fmt;

/// Release track a version is published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseChannel {
    Nightly,
    Stable,
}

impl ReleaseChannel {
    pub fn name(&self) -> &'static str {
        match self {
            ReleaseChannel::Nightly => "nightly",
            ReleaseChannel::Stable => "stable",
        }
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a `bump` changes: a dated nightly qualifier, or one stable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpChannel {
    Nightly,
    Stable(BumpLevel),
}

impl BumpChannel {
    /// The release track the bumped version is published on
    pub fn release_channel(&self) -> ReleaseChannel {
        match self {
            BumpChannel::Nightly => ReleaseChannel::Nightly,
            BumpChannel::Stable(_) => ReleaseChannel::Stable,
        }
    }
}

impl fmt::Display for BumpChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpChannel::Nightly => f.write_str("nightly"),
            BumpChannel::Stable(level) => write!(f, "{}", level),
        }
    }
}
