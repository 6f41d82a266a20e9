//! Target schema for the agent's final answer.

use async_openai::types::{ResponseFormat, ResponseFormatJsonSchema};
use serde_json::Value;

/// JSON Schema the final answer must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    /// Schema name sent to the provider (letters, digits, `_` and `-`).
    pub name: String,
    pub description: String,
    pub schema: Value,
}

impl OutputSchema {
    pub fn new(name: &str, description: &str, schema: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            schema,
        }
    }

    /// Instructions for the system prompt describing the expected output.
    pub fn format_instructions(&self) -> String {
        let schema = serde_json::to_string_pretty(&self.schema).unwrap_or_default();
        format!(
            "Wrap the output in this format and provide no other text.\n\
             The output must be a JSON instance that conforms to the JSON schema below.\n\n\
             ```json\n{}\n```",
            schema
        )
    }

    /// Structured-output response format for the chat completions API.
    pub fn response_format(&self) -> ResponseFormat {
        ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: Some(self.description.clone()),
                name: self.name.clone(),
                schema: Some(self.schema.clone()),
                strict: Some(true),
            },
        }
    }

    /// Names listed under `required`.
    pub fn required_fields(&self) -> Vec<&str> {
        self.schema["required"]
            .as_array()
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_instructions_embed_schema() {
        let schema = OutputSchema::new(
            "note",
            "A note",
            json!({"type": "object", "required": ["text"]}),
        );
        let text = schema.format_instructions();
        assert!(text.contains("\"required\""));
        assert!(text.contains("provide no other text"));
        assert_eq!(schema.required_fields(), vec!["text"]);
    }

    #[test]
    fn test_response_format_is_strict_json_schema() {
        let schema = OutputSchema::new("note", "A note", json!({"type": "object"}));
        match schema.response_format() {
            ResponseFormat::JsonSchema { json_schema } => {
                assert_eq!(json_schema.name, "note");
                assert_eq!(json_schema.strict, Some(true));
            }
            other => panic!("Expected JSON schema format, got {:?}", other),
        }
    }
}
