//! Tools command implementation.

use crate::agent::ToolRegistry;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// List the tools the agent can call.
pub fn run_tools(settings: &Settings) -> Result<()> {
    let registry = ToolRegistry::standard(&settings.tools)?;

    Output::header(&format!("Available tools ({})", registry.len()));
    for descriptor in registry.descriptors() {
        Output::tool(descriptor.name(), descriptor.description());
    }
    println!();

    Output::kv("Wikipedia results", &settings.tools.wiki.top_k_results.to_string());
    Output::kv(
        "Wikipedia max chars",
        &settings.tools.wiki.doc_content_chars_max.to_string(),
    );
    Output::kv(
        "Save file",
        &settings.default_save_path().display().to_string(),
    );

    Ok(())
}
