//! Blocking invocation of external tools.
//!
//! Every tool the coordinator drives (version manifest, npm, the release host)
//! runs through [`ToolCommand`], which captures its output and turns a non-zero
//! exit into [`ReleaseError::ToolInvocation`].

use crate::error::{ReleaseError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Captured result of a finished tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or -1 when the process was killed by a signal
    pub code: i32,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// A single external program invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
    dir: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        ToolCommand {
            program: program.into(),
            args: Vec::new(),
            dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Human-readable form used in diagnostics, e.g. `cargo set-version --bump minor`
    pub fn display(&self) -> String {
        let mut text = self.program.clone();
        for arg in &self.args {
            text.push(' ');
            text.push_str(&arg.to_string_lossy());
        }
        text
    }

    /// Run to completion and capture output without judging the exit code.
    pub fn output(&self) -> Result<ToolOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }

        debug!(command = %self.display(), dir = ?self.dir, "running tool");

        let output = cmd.output().map_err(|e| ReleaseError::ToolInvocation {
            tool: self.display(),
            code: 127,
            stderr: format!("failed to start {}: {}", self.program, e),
        })?;

        let result = ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code().unwrap_or(-1),
        };
        debug!(command = %self.display(), code = result.code, "tool finished");
        Ok(result)
    }

    /// Run and fail with the tool's diagnostics on a non-zero exit.
    pub fn run(&self) -> Result<ToolOutput> {
        let output = self.output()?;
        if !output.success() {
            let stderr = if output.stderr.trim().is_empty() {
                output.stdout.trim().to_string()
            } else {
                output.stderr.trim().to_string()
            };
            return Err(ReleaseError::ToolInvocation {
                tool: self.display(),
                code: output.code,
                stderr,
            });
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_arguments() {
        let cmd = ToolCommand::new("cargo")
            .arg("set-version")
            .args(["--bump", "minor"]);
        assert_eq!(cmd.display(), "cargo set-version --bump minor");
    }

    #[test]
    fn test_missing_program_is_tool_error() {
        let err = ToolCommand::new("definitely-not-a-real-program-4242")
            .run()
            .unwrap_err();
        assert_eq!(err.exit_code(), 127);
        assert!(err.to_string().contains("definitely-not-a-real-program-4242"));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout() {
        let output = ToolCommand::new("sh")
            .args(["-c", "echo 1.2.3"])
            .run()
            .unwrap();
        assert_eq!(output.stdout.trim(), "1.2.3");
        assert!(output.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_keeps_code_and_stderr() {
        let err = ToolCommand::new("sh")
            .args(["-c", "echo broken manifest >&2; exit 3"])
            .run()
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("broken manifest"));
    }

    #[cfg(unix)]
    #[test]
    fn test_current_dir_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let output = ToolCommand::new("sh")
            .args(["-c", "cat marker.txt"])
            .current_dir(dir.path())
            .run()
            .unwrap();
        assert_eq!(output.stdout, "here");
    }
}
