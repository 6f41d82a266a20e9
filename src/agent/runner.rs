//! Agent runner with tool calling loop.

use super::schema::OutputSchema;
use super::tools::{parse_arguments, ToolRegistry};
use crate::config::{AgentSettings, ModelSettings};
use crate::error::{DelveError, Result};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Author of an input message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A conversational message handed to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputMessage {
    pub role: Role,
    pub content: String,
}

impl InputMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
        }
    }

    fn to_request_message(&self) -> Result<ChatCompletionRequestMessage> {
        let message = match self.role {
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(self.content.clone())
                .build()
                .map_err(|e| DelveError::Agent(e.to_string()))?
                .into(),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(self.content.clone())
                .build()
                .map_err(|e| DelveError::Agent(e.to_string()))?
                .into(),
        };
        Ok(message)
    }
}

/// Everything one agent invocation needs.
#[derive(Debug, Clone, Copy)]
pub struct AgentRequest<'a> {
    pub system_prompt: &'a str,
    pub messages: &'a [InputMessage],
    pub tools: &'a ToolRegistry,
    pub output_schema: &'a OutputSchema,
}

/// Capability that runs a tool-use loop and coerces the final answer.
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Run the loop to completion.
    async fn invoke(&self, request: AgentRequest<'_>) -> Result<AgentOutcome>;
}

/// Agent backed by an OpenAI-compatible chat completions API.
pub struct OpenAIAgent {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_iterations: usize,
}

impl OpenAIAgent {
    /// Create an agent from an existing client.
    pub fn new(client: Client<OpenAIConfig>, model: &str) -> Self {
        let defaults = ModelSettings::default();
        Self {
            client,
            model: model.to_string(),
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            max_iterations: AgentSettings::default().max_iterations,
        }
    }

    /// Create an agent from configuration, reading the API key from the environment.
    pub fn from_settings(model: &ModelSettings, agent: &AgentSettings) -> Result<Self> {
        let client = create_client(model, Duration::from_secs(agent.timeout_secs))?;
        Ok(Self::new(client, &model.name)
            .with_temperature(model.temperature)
            .with_max_tokens(model.max_tokens)
            .with_max_iterations(agent.max_iterations))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set maximum iterations for the agent loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Execute a single tool call and return a record of it.
    ///
    /// Unknown tools and unusable arguments are reported back to the model.
    /// Provider and IO failures abort the invocation.
    async fn execute_tool_call(
        &self,
        tools: &ToolRegistry,
        tool_call: &ChatCompletionMessageToolCall,
    ) -> Result<ToolCallRecord> {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = match tools.get(name) {
            Some(tool) => {
                let args = parse_arguments(arguments, tool.primary_argument());
                match tool.call(&args).await {
                    Ok(output) => output,
                    Err(DelveError::InvalidInput(msg)) => format!("Invalid tool arguments: {}", msg),
                    Err(e) => return Err(e),
                }
            }
            None => format!("Unknown tool: {}", name),
        };

        Ok(ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        })
    }
}

#[async_trait]
impl AgentExecutor for OpenAIAgent {
    async fn invoke(&self, request: AgentRequest<'_>) -> Result<AgentOutcome> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system_prompt.to_string())
                .build()
                .map_err(|e| DelveError::Agent(e.to_string()))?
                .into(),
        ];
        for message in request.messages {
            messages.push(message.to_request_message()?);
        }

        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(DelveError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let mut args = CreateChatCompletionRequestArgs::default();
            args.model(&self.model)
                .messages(messages.clone())
                .temperature(self.temperature)
                .max_completion_tokens(self.max_tokens)
                .response_format(request.output_schema.response_format());
            if !request.tools.is_empty() {
                args.tools(request.tools.definitions());
            }
            let completion_request = args.build().map_err(|e| DelveError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(completion_request)
                .await
                .map_err(|e| DelveError::Provider(e.to_string()))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| DelveError::Agent("No response from model".to_string()))?;

            match choice.message.tool_calls {
                Some(ref tool_calls) if !tool_calls.is_empty() => {
                    let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                        .tool_calls(tool_calls.clone())
                        .build()
                        .map_err(|e| DelveError::Agent(e.to_string()))?;
                    messages.push(assistant_msg.into());

                    for tool_call in tool_calls {
                        let record = self.execute_tool_call(request.tools, tool_call).await?;

                        let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                            .tool_call_id(&tool_call.id)
                            .content(record.result.clone())
                            .build()
                            .map_err(|e| DelveError::Agent(e.to_string()))?;
                        messages.push(tool_msg.into());

                        tool_calls_made.push(record);
                    }
                }
                _ => {
                    return Ok(AgentOutcome::from_final_text(
                        choice.message.content.clone(),
                        tool_calls_made,
                        iterations,
                    ));
                }
            }
        }
    }
}

/// Coerce a final answer into a JSON object.
///
/// Accepts bare JSON, JSON inside a Markdown code fence, or a JSON object
/// embedded in surrounding prose.
pub fn coerce_structured(content: &str) -> Option<Value> {
    let content = content.trim();

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(strip_code_fence(content)) {
        return Some(value);
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&content[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. "json") on the opening line. A fence that
    // never breaks the line keeps everything after the backticks.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Result of an agent invocation.
#[derive(Debug, Clone, Default)]
pub struct AgentOutcome {
    /// The final answer text from the model.
    pub final_text: Option<String>,
    /// The final answer coerced into a JSON object, if that succeeded.
    pub structured_response: Option<Value>,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

impl AgentOutcome {
    /// Build an outcome from the model's final message.
    pub fn from_final_text(
        content: Option<String>,
        tool_calls: Vec<ToolCallRecord>,
        iterations: usize,
    ) -> Self {
        let structured_response = content.as_deref().and_then(coerce_structured);
        if structured_response.is_none() {
            warn!("Final answer could not be coerced into the output schema");
        }

        Self {
            final_text: content,
            structured_response,
            tool_calls,
            iterations,
        }
    }
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
