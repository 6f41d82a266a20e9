//! Agent system for research tasks with tool calling.
//!
//! Provides the [`AgentExecutor`] capability, an OpenAI-backed implementation
//! that runs the tool-use loop, and the fixed registry of research tools.

mod runner;
mod schema;
mod tools;

pub use runner::{
    coerce_structured, AgentExecutor, AgentOutcome, AgentRequest, InputMessage, OpenAIAgent,
    Role, ToolCallRecord,
};
pub use schema::OutputSchema;
pub use tools::{
    extract_results, format_block, format_pages, parse_arguments, save_to_file, SaveTool,
    SearchResult, SearchTool, Tool, ToolDescriptor, ToolRegistry, WikiTool,
};
