//! Research command implementation.

use crate::agent::save_to_file;
use crate::cli::preflight::{self, Operation};
use crate::cli::{truncate, Output};
use crate::config::Settings;
use crate::research::{
    extract, render, Extraction, ResearchPipeline, NO_STRUCTURED_RESPONSE, TOPIC_PROMPT,
};
use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Options for a single research run.
#[derive(Debug, Default)]
pub struct ResearchOptions {
    pub topic: Option<String>,
    pub use_default: bool,
    pub no_tools: bool,
    pub model: Option<String>,
    pub max_iterations: Option<usize>,
    pub save: Option<String>,
    pub json: bool,
}

/// Run the research command.
pub async fn run_research(options: ResearchOptions, mut settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Research, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'delve doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    if let Some(model) = options.model {
        settings.model.name = model;
    }
    if let Some(max) = options.max_iterations {
        settings.agent.max_iterations = max;
    }

    let topic = match (options.topic, options.use_default) {
        (Some(topic), _) => topic,
        (None, true) => settings.research.default_topic.clone(),
        (None, false) => prompt_topic()?,
    };

    let pipeline = ResearchPipeline::from_settings(&settings, !options.no_tools)?;

    let spinner = Output::spinner("Researching...");
    let outcome = match pipeline.run(&topic).await {
        Ok(outcome) => {
            spinner.finish_and_clear();
            outcome
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Research failed: {}", e));
            return Err(e.into());
        }
    };

    println!();
    let extraction = if options.json {
        match extract(&outcome) {
            Some(response) => {
                println!("{}", serde_json::to_string_pretty(&response)?);
                Extraction::Structured(response)
            }
            None => {
                println!("{}", NO_STRUCTURED_RESPONSE);
                Extraction::Missing
            }
        }
    } else {
        let stdout = io::stdout();
        render(&outcome, &mut stdout.lock())?
    };

    if !outcome.tool_calls.is_empty() {
        Output::header(&format!("Tool calls ({})", outcome.tool_calls.len()));
        for call in &outcome.tool_calls {
            Output::info(&format!("  {} {}", call.name, truncate(&call.arguments, 60)));
        }
        println!();
    }

    Output::info(&format!("Completed in {} iteration(s)", outcome.iterations));

    if let (Some(target), Some(response)) = (options.save, extraction.response()) {
        let path = if target.is_empty() {
            settings.default_save_path()
        } else {
            Settings::expand_path(&target)
        };
        let message = save_to_file(&response.format_for_display(), &path)?;
        Output::success(&message);
    }

    Ok(())
}

/// Ask for a topic on stdin. Only the line terminator is removed.
fn prompt_topic() -> Result<String> {
    let mut stdout = io::stdout();
    print!("{}", TOPIC_PROMPT);
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    let topic = input.strip_suffix('\n').unwrap_or(&input);
    let topic = topic.strip_suffix('\r').unwrap_or(topic);
    Ok(topic.to_string())
}
