use crate::config::ManifestConfig;
use crate::error::Result;
use crate::manifest::{SetVersion, VersionStore};
use crate::process::ToolCommand;
use std::path::{Path, PathBuf};

/// Version store backed by the workspace `Cargo.toml`.
///
/// Reads through `cargo get` and writes through `cargo set-version`
/// (cargo-edit), so the manifest's formatting is left to those tools.
pub struct CargoVersionStore {
    program: String,
    workspace: bool,
    root: PathBuf,
}

impl CargoVersionStore {
    pub fn new(config: &ManifestConfig, root: impl AsRef<Path>) -> Self {
        CargoVersionStore {
            program: config.program.clone(),
            workspace: config.workspace,
            root: root.as_ref().to_path_buf(),
        }
    }

    fn command(&self) -> ToolCommand {
        ToolCommand::new(&self.program).current_dir(&self.root)
    }

    fn get_command(&self) -> ToolCommand {
        let key = if self.workspace {
            "workspace.package.version"
        } else {
            "package.version"
        };
        self.command().args(["get", key])
    }

    fn set_command(&self, change: &SetVersion) -> ToolCommand {
        let mut cmd = self.command().arg("set-version");
        if self.workspace {
            cmd = cmd.arg("--workspace");
        }
        match change {
            SetVersion::Bump(level) => cmd.args(["--bump", level.as_str()]),
            SetVersion::Explicit(version) => cmd.arg(version),
        }
    }
}

impl VersionStore for CargoVersionStore {
    fn get_version(&self) -> Result<String> {
        let output = self.get_command().run()?;
        Ok(output.stdout.trim().to_string())
    }

    fn set_version(&self, change: &SetVersion) -> Result<()> {
        self.set_command(change).run()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BumpLevel;

    fn store(workspace: bool) -> CargoVersionStore {
        let config = ManifestConfig {
            program: "cargo".to_string(),
            workspace,
        };
        CargoVersionStore::new(&config, ".")
    }

    #[test]
    fn test_get_command_workspace() {
        assert_eq!(
            store(true).get_command().display(),
            "cargo get workspace.package.version"
        );
    }

    #[test]
    fn test_get_command_single_package() {
        assert_eq!(store(false).get_command().display(), "cargo get package.version");
    }

    #[test]
    fn test_set_command_bump() {
        let cmd = store(true).set_command(&SetVersion::Bump(BumpLevel::Minor));
        assert_eq!(cmd.display(), "cargo set-version --workspace --bump minor");
    }

    #[test]
    fn test_set_command_explicit() {
        let cmd = store(false).set_command(&SetVersion::Explicit(
            "1.3.0-nightly.2024.3.5".to_string(),
        ));
        assert_eq!(cmd.display(), "cargo set-version 1.3.0-nightly.2024.3.5");
    }
}
