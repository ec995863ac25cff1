use crate::config::WebConfig;
use crate::error::Result;
use crate::manifest::WebManifest;
use crate::process::ToolCommand;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The npm workspace under `web/`.
pub struct NpmManifest {
    program: String,
    directory: PathBuf,
    regenerate_script: Option<String>,
}

impl NpmManifest {
    /// `root` is the checkout root; the configured directory is resolved against it.
    pub fn new(config: &WebConfig, root: impl AsRef<Path>) -> Self {
        NpmManifest {
            program: config.program.clone(),
            directory: root.as_ref().join(&config.directory),
            regenerate_script: config.regenerate_script.clone(),
        }
    }

    fn command(&self) -> ToolCommand {
        ToolCommand::new(&self.program).current_dir(&self.directory)
    }

    fn version_command(&self, version: &str) -> ToolCommand {
        self.command().arg("version").arg(version).args([
            "--no-git-tag-version",
            "--allow-same-version",
            "--workspaces",
            "--include-workspace-root",
        ])
    }
}

impl WebManifest for NpmManifest {
    fn install(&self) -> Result<()> {
        self.command().arg("install").run()?;
        Ok(())
    }

    fn set_version(&self, version: &str) -> Result<()> {
        self.version_command(version).run()?;
        Ok(())
    }

    fn regenerate(&self) -> Result<()> {
        match &self.regenerate_script {
            Some(script) => {
                self.command().args(["run", script.as_str()]).run()?;
            }
            None => debug!("no regenerate script configured"),
        }
        Ok(())
    }
}
