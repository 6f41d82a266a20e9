//! One research run: build the request, invoke the agent, hand back the outcome.

use super::request::ResearchRequest;
use super::response::ResearchResponse;
use crate::agent::{AgentExecutor, AgentOutcome, AgentRequest, OpenAIAgent, OutputSchema, ToolRegistry};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use std::sync::Arc;
use tracing::{info, instrument};

/// Everything needed for a research run, constructed once up front.
pub struct ResearchPipeline {
    executor: Arc<dyn AgentExecutor>,
    tools: ToolRegistry,
    system_prompt: String,
    schema: OutputSchema,
}

impl ResearchPipeline {
    /// Wire a pipeline around an existing executor and tool set.
    pub fn new(executor: Arc<dyn AgentExecutor>, tools: ToolRegistry, prompts: &Prompts) -> Self {
        let schema = ResearchResponse::output_schema();
        let system_prompt = prompts.research_system(&schema.format_instructions());

        Self {
            executor,
            tools,
            system_prompt,
            schema,
        }
    }

    /// Build the OpenAI-backed pipeline from settings.
    ///
    /// With `use_tools` false the agent runs with an empty tool set.
    pub fn from_settings(settings: &Settings, use_tools: bool) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let tools = if use_tools {
            ToolRegistry::standard(&settings.tools)?
        } else {
            ToolRegistry::empty()
        };

        let agent = OpenAIAgent::from_settings(&settings.model, &settings.agent)?;

        Ok(Self::new(Arc::new(agent), tools, &prompts))
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Research a topic.
    #[instrument(skip(self), fields(tools = self.tools.len()))]
    pub async fn run(&self, topic: &str) -> Result<AgentOutcome> {
        info!("Researching topic: {}", topic);

        let messages = ResearchRequest::new(topic).into_messages();
        let request = AgentRequest {
            system_prompt: &self.system_prompt,
            messages: &messages,
            tools: &self.tools,
            output_schema: &self.schema,
        };

        self.executor.invoke(request).await
    }
}
