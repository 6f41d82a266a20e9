//! Error types for Delve.

use thiserror::Error;

/// Library-level error type for Delve operations.
#[derive(Error, Debug)]
pub enum DelveError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid tool name '{0}': names must be non-empty and contain no whitespace")]
    InvalidToolName(String),

    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Tool '{name}' failed: {message}")]
    Tool { name: String, message: String },

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Model provider error: {0}")]
    Provider(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl DelveError {
    /// Wrap a failure raised inside a named tool.
    pub fn tool(name: &str, message: impl Into<String>) -> Self {
        DelveError::Tool {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for Delve operations.
pub type Result<T> = std::result::Result<T, DelveError>;
