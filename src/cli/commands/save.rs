//! Save command implementation.

use crate::agent::save_to_file;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Append text to a research file outside of an agent run.
pub fn run_save(data: &str, file: Option<&str>, settings: &Settings) -> Result<()> {
    preflight::check(Operation::Save, settings)?;

    let path = match file {
        Some(f) => Settings::expand_path(f),
        None => settings.default_save_path(),
    };

    let message = save_to_file(data, &path)?;
    Output::success(&message);
    Ok(())
}
