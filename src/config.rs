use crate::domain::ReleaseNaming;
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the complete configuration for release-coordinator.
///
/// Every section is optional; the defaults describe the Ruffle repository layout.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub metainfo: MetainfoConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

impl Config {
    /// Naming rules for tags and package files derived from this configuration
    pub fn naming(&self) -> ReleaseNaming {
        ReleaseNaming::new(&self.project.name, &self.release.nightly_prefix)
    }

    /// Canonical page of a published release, as linked from the metadata ledger.
    pub fn release_url(&self, tag: &str) -> String {
        format!(
            "{}/releases/tag/{}",
            self.project.repository_url.trim_end_matches('/'),
            tag
        )
    }
}

fn default_project_name() -> String {
    "ruffle".to_string()
}

fn default_repository_url() -> String {
    "https://github.com/ruffle-rs/ruffle".to_string()
}

/// Identity of the released project.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    /// Stem of every package filename
    #[serde(default = "default_project_name")]
    pub name: String,

    #[serde(default = "default_repository_url")]
    pub repository_url: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            name: default_project_name(),
            repository_url: default_repository_url(),
        }
    }
}

fn default_cargo() -> String {
    "cargo".to_string()
}

fn default_true() -> bool {
    true
}

/// The primary (authoritative) version manifest.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ManifestConfig {
    #[serde(default = "default_cargo")]
    pub program: String,

    /// Version lives in `[workspace.package]` rather than `[package]`
    #[serde(default = "default_true")]
    pub workspace: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            program: default_cargo(),
            workspace: true,
        }
    }
}

fn default_web_directory() -> PathBuf {
    PathBuf::from("web")
}

fn default_npm() -> String {
    "npm".to_string()
}

fn default_regenerate_script() -> Option<String> {
    Some("version-seal".to_string())
}

/// The secondary, web-facing manifest kept in sync with the primary one.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WebConfig {
    #[serde(default = "default_web_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_npm")]
    pub program: String,

    /// Package script regenerating the build-time version constants
    #[serde(default = "default_regenerate_script")]
    pub regenerate_script: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        WebConfig {
            directory: default_web_directory(),
            program: default_npm(),
            regenerate_script: default_regenerate_script(),
        }
    }
}

fn default_metainfo_path() -> PathBuf {
    PathBuf::from("desktop/packages/linux/rs.ruffle.Ruffle.metainfo.xml")
}

/// Desktop metadata descriptor holding the release ledger.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MetainfoConfig {
    #[serde(default = "default_metainfo_path")]
    pub path: PathBuf,
}

impl Default for MetainfoConfig {
    fn default() -> Self {
        MetainfoConfig {
            path: default_metainfo_path(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_author_name() -> String {
    "RuffleBuild".to_string()
}

fn default_author_email() -> String {
    "ruffle@ruffle.rs".to_string()
}

/// Source control settings, including the fixed identity release commits use.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_author_name")]
    pub author_name: String,

    #[serde(default = "default_author_email")]
    pub author_email: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            author_name: default_author_name(),
            author_email: default_author_email(),
        }
    }
}

fn default_gh() -> String {
    "gh".to_string()
}

fn default_nightly_prefix() -> String {
    "nightly-".to_string()
}

fn default_nightly_lookback() -> usize {
    10
}

/// Release hosting settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_gh")]
    pub program: String,

    #[serde(default = "default_nightly_prefix")]
    pub nightly_prefix: String,

    /// How many recent releases to scan for the previous nightly tag
    #[serde(default = "default_nightly_lookback")]
    pub nightly_lookback: usize,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            program: default_gh(),
            nightly_prefix: default_nightly_prefix(),
            nightly_lookback: default_nightly_lookback(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `.release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./release.toml").exists() {
        fs::read_to_string("./release.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".release.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config = toml::from_str(text).map_err(|e| ReleaseError::config(e.to_string()))?;

    if config.release.nightly_lookback == 0 {
        return Err(ReleaseError::config(
            "release.nightly_lookback must be at least 1",
        ));
    }
    if config.release.nightly_prefix.is_empty() {
        return Err(ReleaseError::config(
            "release.nightly_prefix must not be empty",
        ));
    }

    Ok(config)
}
