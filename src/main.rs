//! Delve CLI entry point.

use anyhow::Result;
use clap::Parser;
use delve::cli::commands::{self, ResearchOptions};
use delve::cli::{Cli, Commands};
use delve::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("delve={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    // Execute command
    match cli.command {
        Commands::Research {
            topic,
            default,
            no_tools,
            model,
            max_iterations,
            save,
            json,
        } => {
            let options = ResearchOptions {
                topic,
                use_default: default,
                no_tools,
                model,
                max_iterations,
                save,
                json,
            };
            commands::run_research(options, settings).await?;
        }

        Commands::Tools => {
            commands::run_tools(&settings)?;
        }

        Commands::Save { data, file } => {
            commands::run_save(&data, file.as_deref(), &settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings)?;
        }
    }

    Ok(())
}
