//! Tool definitions and the registry handed to the agent.
//!
//! Every tool carries a [`ToolDescriptor`] whose name is the identifier the
//! model uses to route calls, so names are validated on construction and
//! must be unique within a registry.

mod save;
mod search;
mod wiki;

pub use save::{format_block, save_to_file, SaveTool};
pub use search::{extract_results, SearchResult, SearchTool};
pub use wiki::{format_pages, WikiTool};

use crate::config::ToolSettings;
use crate::error::{DelveError, Result};
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// User agent sent to the search and encyclopedia providers.
const USER_AGENT: &str = concat!("delve/", env!("CARGO_PKG_VERSION"));

/// Name and description of a tool as presented to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    name: String,
    description: String,
}

impl ToolDescriptor {
    /// Create a descriptor, rejecting empty names and names containing whitespace.
    pub fn new(name: &str, description: &str) -> Result<Self> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(DelveError::InvalidToolName(name.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A callable exposed to the agent.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name and description used by the model to decide when to call this tool.
    fn descriptor(&self) -> &ToolDescriptor;

    /// JSON Schema of the tool's arguments.
    fn parameters(&self) -> Value;

    /// Name of the argument that receives a bare (non-JSON) argument string.
    fn primary_argument(&self) -> &str;

    /// Run the tool.
    ///
    /// Returns [`DelveError::InvalidInput`] when the arguments are unusable;
    /// any other error is a provider or IO failure.
    async fn call(&self, args: &Value) -> Result<String>;
}

/// Fixed set of tools available to one agent invocation.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// A registry with no tools, for plain structured-output runs.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard research tools: web search, Wikipedia lookup and file save.
    pub fn standard(settings: &ToolSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        let mut registry = Self::empty();
        registry.register(Arc::new(SearchTool::new(http.clone(), &settings.search)?))?;
        registry.register(Arc::new(WikiTool::new(http, &settings.wiki)?))?;
        registry.register(Arc::new(SaveTool::new(PathBuf::from(
            shellexpand::tilde(&settings.save.default_filename).to_string(),
        ))?))?;
        Ok(registry)
    }

    /// Add a tool. Fails if a tool with the same name is already present.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.descriptor().name();
        if self.get(name).is_some() {
            return Err(DelveError::DuplicateTool(name.to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.descriptor().name() == name)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor())
    }

    pub fn names(&self) -> Vec<&str> {
        self.descriptors().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get OpenAI function/tool definitions for the registered tools.
    pub fn definitions(&self) -> Vec<ChatCompletionTool> {
        self.tools
            .iter()
            .map(|tool| ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: tool.descriptor().name().to_string(),
                    description: Some(tool.descriptor().description().to_string()),
                    parameters: Some(tool.parameters()),
                    strict: None,
                },
            })
            .collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Parse the argument string of a tool call.
///
/// Models sometimes send a bare string instead of a JSON object; that string
/// is passed to the tool as its primary argument.
pub fn parse_arguments(raw: &str, primary: &str) -> Value {
    let bare = match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => return value,
        Ok(Value::String(s)) => s,
        _ => raw.to_string(),
    };

    let mut args = serde_json::Map::new();
    args.insert(primary.to_string(), Value::String(bare));
    Value::Object(args)
}

/// Fetch a required string argument.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args[key]
        .as_str()
        .ok_or_else(|| DelveError::InvalidInput(format!("Missing '{}' argument", key)))
}

/// Reduce a fragment of HTML to plain text.
pub(crate) fn strip_html(fragment: &str) -> String {
    static TAG: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    let tag = TAG.get_or_init(|| regex::Regex::new(r"<[^>]+>").expect("Invalid regex"));

    let text = tag.replace_all(fragment, "");
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool {
        descriptor: ToolDescriptor,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.descriptor
        }

        fn parameters(&self) -> Value {
            serde_json::json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }

        fn primary_argument(&self) -> &str {
            "text"
        }

        async fn call(&self, args: &Value) -> Result<String> {
            Ok(required_str(args, "text")?.to_string())
        }
    }

    fn echo(name: &str) -> Arc<dyn Tool> {
        Arc::new(EchoTool {
            descriptor: ToolDescriptor::new(name, "Echo the input").unwrap(),
        })
    }

    #[test]
    fn test_descriptor_rejects_whitespace() {
        for name in ["search internet", " search", "save\tresearch", "wiki\n", ""] {
            let err = ToolDescriptor::new(name, "x").unwrap_err();
            assert!(matches!(err, DelveError::InvalidToolName(_)), "{name:?}");
        }
        assert!(ToolDescriptor::new("search_internet", "x").is_ok());
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = ToolRegistry::empty();
        registry.register(echo("echo")).unwrap();
        let err = registry.register(echo("echo")).unwrap_err();
        assert!(matches!(err, DelveError::DuplicateTool(name) if name == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_standard_registry() {
        let registry = ToolRegistry::standard(&ToolSettings::default()).unwrap();
        assert_eq!(
            registry.names(),
            vec!["search_internet", "wikipedia", "save_research"]
        );

        let definitions = registry.definitions();
        assert_eq!(definitions.len(), 3);
        assert_eq!(definitions[2].function.name, "save_research");
        assert_eq!(
            definitions[2].function.description.as_deref(),
            Some("Saves research content to a file.")
        );
    }

    #[test]
    fn test_empty_registry_has_no_definitions() {
        let registry = ToolRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.definitions().is_empty());
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_arguments(r#"{"query": "rust"}"#, "query")["query"], "rust");
        assert_eq!(parse_arguments(r#""rust""#, "query")["query"], "rust");
        assert_eq!(parse_arguments("rust lang", "query")["query"], "rust lang");
    }

    #[tokio::test]
    async fn test_missing_argument_is_invalid_input() {
        let tool = echo("echo");
        let err = tool.call(&serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, DelveError::InvalidInput(_)));
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("The <b>Rust</b> &amp; <i>Cargo</i>\n  book"),
            "The Rust & Cargo book"
        );
    }
}
