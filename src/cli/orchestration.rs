//! Main workflow orchestration logic
//!
//! Sits between CLI argument parsing and the [`Coordinator`]: resolves the
//! release date, builds the real capabilities for a checkout and dispatches
//! one [`Command`].

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};

use crate::config::{load_config, Config};
use crate::domain::{BumpChannel, ReleaseChannel, Version};
use crate::error::{ReleaseError, Result};
use crate::git::Git2Repository;
use crate::hosting::GhReleaseHost;
use crate::manifest::{CargoVersionStore, NpmManifest};
use crate::output::{default_sink, OutputSink};
use crate::ui;
use crate::workflow::{Coordinator, Tools};

/// One unit of work requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the authoritative version
    Version,
    /// Bump the authoritative version, then sync the web manifest unless `sync` is false
    Bump { channel: BumpChannel, sync: bool },
    Sync,
    Commit,
    /// Tag HEAD and push; the channel defaults to that of the current version
    TagAndPush(Option<ReleaseChannel>),
    /// Create the hosted release for an already pushed tag
    Release(ReleaseChannel),
    Metainfo {
        path: Option<PathBuf>,
        version: Option<Version>,
    },
    Pipeline(BumpChannel),
}

/// Arguments for a workflow run
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic,
/// so runs can be started without clap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowArgs {
    /// Path to custom config file
    pub config_path: Option<PathBuf>,

    /// Release date, as given with `--date`
    pub date: Option<String>,

    /// Checkout the release is cut from
    pub root: PathBuf,

    pub command: Command,
}

/// Release date: `--date`, else `RELEASE_DATE`, else today in UTC.
pub fn resolve_date(explicit: Option<&str>) -> Result<NaiveDate> {
    let from_env = std::env::var("RELEASE_DATE").ok().filter(|d| !d.is_empty());
    match explicit.map(str::to_string).or(from_env) {
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|e| {
            ReleaseError::config(format!("invalid release date '{}': {}", text, e))
        }),
        None => Ok(Utc::now().date_naive()),
    }
}

/// Run `command` against `coordinator`, reporting progress through the ui.
pub fn run_command(
    command: &Command,
    coordinator: &Coordinator<'_>,
    config: &Config,
    sink: &mut dyn OutputSink,
) -> Result<()> {
    match command {
        Command::Version => {
            let version = coordinator.current_version()?;
            ui::display_version(&version);
            println!("{}", version);
        }
        Command::Bump { channel, sync } => {
            ui::display_status(&format!("Bumping {} version", channel));
            let ids = coordinator.bump(*channel, sink)?;
            ui::display_identifiers(&ids);
            if *sync {
                ui::display_status("Synchronizing web packages");
                coordinator.sync()?;
                ui::display_success(&format!("Web packages now at {}", ids.version));
            }
        }
        Command::Sync => {
            ui::display_status("Synchronizing web packages");
            let version = coordinator.sync()?;
            ui::display_success(&format!("Web packages now at {}", version));
        }
        Command::Commit => {
            let id = coordinator.commit()?;
            ui::display_success(&format!("Committed {}", id));
        }
        Command::TagAndPush(channel) => {
            let channel = match channel {
                Some(channel) => *channel,
                None => coordinator.inferred_channel()?,
            };
            let tag = coordinator.tag_and_push(channel, sink)?;
            ui::display_tag(&tag, &config.git.remote);
        }
        Command::Release(channel) => {
            let release = coordinator.release(*channel, sink)?;
            ui::display_release(&release);
        }
        Command::Metainfo { path, version } => {
            let entry = coordinator.update_metainfo(version.as_ref(), path.as_deref())?;
            ui::display_ledger_entry(&entry);
        }
        Command::Pipeline(channel) => {
            ui::display_status(&format!(
                "Running {} release for {}",
                channel,
                coordinator.today().format("%Y-%m-%d")
            ));
            let result = coordinator.pipeline(*channel, sink)?;
            ui::display_pipeline_result(&result, &config.git.remote);
        }
    }
    Ok(())
}

/// Main workflow
///
/// Loads configuration, opens the checkout at `args.root`, wires the real
/// tools (cargo, npm, git, gh) and runs the requested command. Outputs go to
/// `GITHUB_OUTPUT` when set, stdout otherwise.
pub fn run_workflow(args: WorkflowArgs) -> Result<()> {
    let config = load_config(args.config_path.as_deref())?;
    let today = resolve_date(args.date.as_deref())?;

    let versions = CargoVersionStore::new(&config.manifest, &args.root);
    let web = NpmManifest::new(&config.web, &args.root);
    let scm = Git2Repository::open(&args.root)?;
    let host = GhReleaseHost::new(&config.release, &args.root);
    let tools = Tools {
        versions: &versions,
        web: &web,
        scm: &scm,
        host: &host,
    };

    let coordinator = Coordinator::new(&config, tools, today).with_root(&args.root);
    let mut sink = default_sink();
    run_command(&args.command, &coordinator, &config, sink.as_mut())
}
