//! Release ledger kept in the desktop metadata descriptor.
//!
//! The descriptor (an AppStream metainfo file) lists past releases newest
//! first inside `<releases>`. Stable releases prepend one entry:
//!
//! ```xml
//! <releases>
//!   <release version="1.2.1" date="2024-03-05">
//!     <url>https://github.com/ruffle-rs/ruffle/releases/tag/v1.2.1</url>
//!   </release>
//!   ...
//! </releases>
//! ```
//!
//! Inserting is not idempotent: running twice for one version records two
//! entries, so callers must insert at most once per release.

pub mod tree;

use crate::error::{ReleaseError, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tracing::warn;
use tree::{Document, Element, EmptyElementStyle, RenderOptions};

/// One published release as recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub version: String,
    pub date: NaiveDate,
    pub url: String,
}

impl LedgerEntry {
    fn to_element(&self) -> Element {
        Element::new("release")
            .with_attribute("version", &self.version)
            .with_attribute("date", self.date.format("%Y-%m-%d").to_string())
            .with_child(Element::new("url").with_text(&self.url))
    }

    fn from_element(element: &Element) -> Option<Self> {
        let version = element.attribute("version")?.to_string();
        let date = NaiveDate::parse_from_str(element.attribute("date")?, "%Y-%m-%d").ok()?;
        let url = element
            .elements()
            .find(|child| child.name == "url")
            .map(|url| url.text().trim().to_string())
            .unwrap_or_default();
        Some(LedgerEntry { version, date, url })
    }
}

/// Layout every ledger file is written with.
pub fn ledger_render_options() -> RenderOptions {
    RenderOptions {
        indent: "  ".to_string(),
        empty_elements: EmptyElementStyle::Compact,
    }
}

fn releases_mut(document: &mut Document) -> Result<&mut Element> {
    document
        .root
        .find_mut("releases")
        .ok_or_else(|| ReleaseError::structural("metainfo document has no <releases> element"))
}

/// Entries in ledger order (newest first). Malformed entries are skipped.
pub fn entries(document: &Document) -> Result<Vec<LedgerEntry>> {
    let releases = document
        .root
        .find("releases")
        .ok_or_else(|| ReleaseError::structural("metainfo document has no <releases> element"))?;
    Ok(releases
        .elements()
        .filter(|e| e.name == "release")
        .filter_map(LedgerEntry::from_element)
        .collect())
}

/// Insert `entry` as the first child of `<releases>`.
pub fn insert_entry(document: &mut Document, entry: &LedgerEntry) -> Result<()> {
    let releases = releases_mut(document)?;
    if releases
        .elements()
        .any(|e| e.name == "release" && e.attribute("version") == Some(entry.version.as_str()))
    {
        warn!(
            version = %entry.version,
            "ledger already lists this version; adding a duplicate entry"
        );
    }
    releases.prepend_element(entry.to_element());
    Ok(())
}

/// Insert `entry` into the ledger file at `path`, rewriting the whole file.
pub fn insert_release(path: &Path, entry: &LedgerEntry) -> Result<()> {
    let text = fs::read_to_string(path)?;
    let mut document = Document::parse(&text)?;
    insert_entry(&mut document, entry)?;
    fs::write(path, document.render(&ledger_render_options()))?;
    Ok(())
}
