//! Delve - a small research assistant
//!
//! Sends a free-text topic to a tool-using language-model agent and coerces
//! its final answer into a fixed report: topic, summary, sources and the
//! tools that were used.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `agent` - The [`agent::AgentExecutor`] capability, the OpenAI-backed
//!   tool loop and the fixed tool registry (web search, Wikipedia, save)
//! - `research` - Request building, the pipeline and report extraction
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use delve::config::Settings;
//! use delve::research::{render, ResearchPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = ResearchPipeline::from_settings(&settings, true)?;
//!
//!     let outcome = pipeline.run("History of the Rust borrow checker").await?;
//!     render(&outcome, &mut std::io::stdout())?;
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod research;

pub use error::{DelveError, Result};
