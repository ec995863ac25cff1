//! Progress and summary formatting.
//!
//! Everything goes to stderr: stdout is reserved for `key=value` outputs when
//! no `GITHUB_OUTPUT` file is configured.

use console::style;

use crate::domain::{ReleaseTag, Version, VersionIdentifierSet};
use crate::metainfo::LedgerEntry;
use crate::workflow::{PipelineResult, PublishedRelease};

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

pub fn display_version(version: &Version) {
    eprintln!("{} {}", style("Version:").bold(), style(version).cyan());
}

/// Summary of a bump: old and new version plus every derived identifier
pub fn display_identifiers(ids: &VersionIdentifierSet) {
    eprintln!("\n{}", style(format!("{} release", ids.channel.name())).bold());
    eprintln!("  From:     {}", style(&ids.current).red());
    eprintln!("  To:       {}", style(&ids.version).green());
    eprintln!("  version4: {}", ids.version4);
    eprintln!("  Tag:      {}", ids.tag_name);
    eprintln!("  Packages: {}*", ids.package_prefix);
}

pub fn display_ledger_entry(entry: &LedgerEntry) {
    display_success(&format!(
        "Recorded {} ({}) in the release ledger",
        entry.version,
        entry.date.format("%Y-%m-%d")
    ));
}

pub fn display_tag(tag: &ReleaseTag, remote: &str) {
    let short = tag.target.get(..8).unwrap_or(&tag.target);
    display_success(&format!(
        "Pushed tag {} ({}) to {}",
        style(&tag.name).green(),
        short,
        remote
    ));
}

pub fn display_release(release: &PublishedRelease) {
    let kind = if release.request.prerelease {
        "pre-release"
    } else {
        "release"
    };
    display_success(&format!(
        "Created {} {} for {}",
        kind,
        style(&release.request.title).bold(),
        release.request.tag
    ));
    match &release.request.notes_start_tag {
        Some(anchor) => eprintln!("  Notes start at {}", anchor),
        None => eprintln!("  Notes cover everything since the previous release"),
    }
}

pub fn display_pipeline_result(result: &PipelineResult, remote: &str) {
    display_identifiers(&result.identifiers);
    eprintln!();
    if let Some(entry) = &result.ledger_entry {
        display_ledger_entry(entry);
    }
    display_success(&format!("Committed {}", result.commit));
    display_tag(&result.tag, remote);
    display_success(&format!(
        "Created release {} for {}",
        style(&result.release.title).bold(),
        result.release.tag
    ));
}
