use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use release_coordinator::cli::orchestration::{run_workflow, Command, WorkflowArgs};
use release_coordinator::domain::{BumpChannel, BumpLevel, ReleaseChannel, Version};
use release_coordinator::{ui, ReleaseError};

#[derive(Parser)]
#[command(
    name = "release-coordinator",
    version,
    about = "Bump, tag and publish Ruffle releases"
)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Release date (YYYY-MM-DD), defaults to $RELEASE_DATE or today (UTC)"
    )]
    date: Option<String>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, global = true, action)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current version
    Version,
    /// Bump the version and emit current-version, version and version4
    Bump {
        #[arg(value_enum)]
        channel: BumpArg,
        #[arg(long, action, help = "Do not update the web packages")]
        no_sync: bool,
    },
    /// Copy the current version into the web packages
    Sync,
    /// Commit the bumped manifests
    Commit,
    /// Tag HEAD and push the tag; emits tag_name
    TagAndPush {
        #[arg(value_enum, help = "Defaults to the channel of the current version")]
        channel: Option<ChannelArg>,
    },
    /// Create the release for the pushed tag; emits tag_name and package_prefix
    Release {
        #[arg(value_enum)]
        channel: ChannelArg,
    },
    /// Record a release in the desktop metainfo file
    Metainfo {
        #[arg(long, help = "Metainfo file, defaults to the configured path")]
        path: Option<PathBuf>,
        #[arg(long, help = "Version to record, defaults to the current version")]
        version: Option<String>,
    },
    /// Run every step for one release
    Pipeline {
        #[arg(value_enum)]
        channel: BumpArg,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum BumpArg {
    Nightly,
    Major,
    Minor,
    Patch,
}

impl From<BumpArg> for BumpChannel {
    fn from(arg: BumpArg) -> Self {
        match arg {
            BumpArg::Nightly => BumpChannel::Nightly,
            BumpArg::Major => BumpChannel::Stable(BumpLevel::Major),
            BumpArg::Minor => BumpChannel::Stable(BumpLevel::Minor),
            BumpArg::Patch => BumpChannel::Stable(BumpLevel::Patch),
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum ChannelArg {
    Nightly,
    Stable,
}

impl From<ChannelArg> for ReleaseChannel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Nightly => ReleaseChannel::Nightly,
            ChannelArg::Stable => ReleaseChannel::Stable,
        }
    }
}

fn main() {
    let args = Args::parse();

    let log_level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(log_level).into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(args) {
        ui::display_error(&format!("{:#}", err));
        let code = err
            .downcast_ref::<ReleaseError>()
            .map(ReleaseError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(args: Args) -> Result<()> {
    let command = match args.command {
        Commands::Version => Command::Version,
        Commands::Bump { channel, no_sync } => Command::Bump {
            channel: channel.into(),
            sync: !no_sync,
        },
        Commands::Sync => Command::Sync,
        Commands::Commit => Command::Commit,
        Commands::TagAndPush { channel } => Command::TagAndPush(channel.map(Into::into)),
        Commands::Release { channel } => Command::Release(channel.into()),
        Commands::Metainfo { path, version } => Command::Metainfo {
            path,
            version: version
                .as_deref()
                .map(Version::parse)
                .transpose()
                .context("invalid --version")?,
        },
        Commands::Pipeline { channel } => Command::Pipeline(channel.into()),
    };

    let root = std::env::current_dir().context("cannot determine working directory")?;
    run_workflow(WorkflowArgs {
        config_path: args.config,
        date: args.date,
        root,
        command,
    })?;
    Ok(())
}
