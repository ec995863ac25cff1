use crate::domain::Version;
use crate::error::Result;
use crate::manifest::WebManifest;
use tracing::info;

/// Copy the authoritative version into the web manifest and regenerate the
/// build-time version artifacts.
///
/// Runs after a bump and before the release commit.
pub fn synchronize(web: &dyn WebManifest, version: &Version) -> Result<()> {
    info!(%version, "synchronizing web manifest");
    web.install()?;
    web.set_version(&version.to_string())?;
    web.regenerate()?;
    Ok(())
}
