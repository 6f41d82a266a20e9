//! CLI module for Delve.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{truncate, Output};

use clap::{Parser, Subcommand};

/// Delve - a small research assistant
///
/// Sends a topic to a language-model agent that can search the web, look
/// things up on Wikipedia and save notes, then prints a structured report.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a topic and print a structured report
    Research {
        /// Topic to research (prompted for interactively if omitted)
        topic: Option<String>,

        /// Research the configured default topic
        #[arg(long, conflicts_with = "topic")]
        default: bool,

        /// Run the agent without any tools
        #[arg(long)]
        no_tools: bool,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum model calls before giving up
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Append the report to a file; `--save` uses the default file,
        /// `--save=PATH` picks one
        #[arg(long, value_name = "PATH", num_args = 0..=1, require_equals = true, default_missing_value = "")]
        save: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the tools available to the agent
    Tools,

    /// Append text to a research file, as the save tool does
    Save {
        /// Text to save
        data: String,

        /// File to append to
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Check configuration and credentials
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file if none exists
    Init,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_research_flags() {
        let cli = Cli::parse_from(["delve", "research", "rust vs go", "--no-tools", "--save"]);
        match cli.command {
            Commands::Research {
                topic,
                no_tools,
                save,
                json,
                ..
            } => {
                assert_eq!(topic.as_deref(), Some("rust vs go"));
                assert!(no_tools);
                assert_eq!(save.as_deref(), Some(""));
                assert!(!json);
            }
            other => panic!("Expected research command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_research_without_topic() {
        let cli = Cli::parse_from(["delve", "-vv", "research", "--save=notes.txt"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Research { topic, save, .. } => {
                assert!(topic.is_none());
                assert_eq!(save.as_deref(), Some("notes.txt"));
            }
            other => panic!("Expected research command, got {:?}", other),
        }
    }

    #[test]
    fn test_default_conflicts_with_topic() {
        assert!(Cli::try_parse_from(["delve", "research", "x", "--default"]).is_err());
    }

    #[test]
    fn test_bare_save_keeps_following_topic() {
        let cli = Cli::parse_from(["delve", "research", "--save", "some topic"]);
        match cli.command {
            Commands::Research { topic, save, .. } => {
                assert_eq!(topic.as_deref(), Some("some topic"));
                assert_eq!(save.as_deref(), Some(""));
            }
            other => panic!("Expected research command, got {:?}", other),
        }
    }
}
