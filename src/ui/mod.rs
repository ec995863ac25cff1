//! User interface module.
//!
//! The coordinator runs unattended in CI, so there are no prompts; this
//! module only formats progress and summaries (see [`formatter`]).

pub mod formatter;

pub use formatter::{
    display_error, display_identifiers, display_ledger_entry, display_pipeline_result,
    display_release, display_status, display_success, display_tag, display_version,
};
