//! Named outputs handed to later pipeline stages.
//!
//! Outputs are append-only `key=value` pairs. In GitHub Actions they go to the
//! file named by `GITHUB_OUTPUT`; elsewhere they are printed to stdout.

use crate::error::{ReleaseError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CURRENT_VERSION: &str = "current-version";
pub const VERSION: &str = "version";
pub const VERSION4: &str = "version4";
pub const TAG_NAME: &str = "tag_name";
pub const PACKAGE_PREFIX: &str = "package_prefix";

/// Destination for step outputs
pub trait OutputSink {
    fn emit(&mut self, key: &str, value: &str) -> Result<()>;
}

fn check_line(key: &str, value: &str) -> Result<()> {
    if key.is_empty() || key.contains(['=', '\n']) || value.contains('\n') {
        return Err(ReleaseError::structural(format!(
            "output {:?}={:?} cannot be written as a single key=value line",
            key, value
        )));
    }
    Ok(())
}

/// Appends to a GitHub Actions output file
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileSink {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Sink for the file named by `GITHUB_OUTPUT`, if set
    pub fn from_env() -> Option<Self> {
        std::env::var_os("GITHUB_OUTPUT")
            .filter(|p| !p.is_empty())
            .map(FileSink::new)
    }
}

impl OutputSink for FileSink {
    fn emit(&mut self, key: &str, value: &str) -> Result<()> {
        check_line(key, value)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}={}", key, value)?;
        Ok(())
    }
}

/// Prints outputs to stdout
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, key: &str, value: &str) -> Result<()> {
        check_line(key, value)?;
        println!("{}={}", key, value);
        Ok(())
    }
}

/// Keeps outputs in memory, for tests and callers embedding the library
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value emitted under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

impl OutputSink for MemorySink {
    fn emit(&mut self, key: &str, value: &str) -> Result<()> {
        check_line(key, value)?;
        self.entries.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// `GITHUB_OUTPUT` file when running in Actions, stdout otherwise
pub fn default_sink() -> Box<dyn OutputSink> {
    match FileSink::from_env() {
        Some(sink) => Box::new(sink),
        None => Box::new(StdoutSink),
    }
}
