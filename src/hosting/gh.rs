use crate::config::ReleaseConfig;
use crate::error::Result;
use crate::hosting::{ReleaseHost, ReleaseRecord, ReleaseRequest};
use crate::process::ToolCommand;
use std::path::{Path, PathBuf};

/// GitHub releases through the `gh` CLI.
///
/// Authentication is whatever `gh` is configured with (`GH_TOKEN` in CI).
pub struct GhReleaseHost {
    program: String,
    root: PathBuf,
}

impl GhReleaseHost {
    pub fn new(config: &ReleaseConfig, root: impl AsRef<Path>) -> Self {
        GhReleaseHost {
            program: config.program.clone(),
            root: root.as_ref().to_path_buf(),
        }
    }

    fn command(&self) -> ToolCommand {
        ToolCommand::new(&self.program).current_dir(&self.root)
    }

    fn list_command(&self, limit: usize) -> ToolCommand {
        self.command().args([
            "release".to_string(),
            "list".to_string(),
            "--limit".to_string(),
            limit.to_string(),
            "--json".to_string(),
            "tagName".to_string(),
        ])
    }

    fn create_command(&self, request: &ReleaseRequest) -> ToolCommand {
        let mut cmd = self
            .command()
            .args(["release", "create"])
            .arg(&request.tag)
            .arg("--title")
            .arg(&request.title)
            .args(["--generate-notes", "--verify-tag"]);
        if let Some(anchor) = &request.notes_start_tag {
            cmd = cmd.arg("--notes-start-tag").arg(anchor);
        }
        if request.prerelease {
            cmd = cmd.arg("--prerelease");
        }
        cmd
    }
}

/// Parse `gh release list --json tagName` output
pub fn parse_release_list(json: &str) -> Result<Vec<ReleaseRecord>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(json)?)
}

impl ReleaseHost for GhReleaseHost {
    fn list_releases(&self, limit: usize) -> Result<Vec<ReleaseRecord>> {
        let output = self.list_command(limit).run()?;
        parse_release_list(&output.stdout)
    }

    fn create_release(&self, request: &ReleaseRequest) -> Result<()> {
        self.create_command(request).run()?;
        Ok(())
    }
}
