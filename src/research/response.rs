//! The structured research report and its console rendering.

use crate::agent::{AgentOutcome, OutputSchema};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::{self, Write};
use tracing::warn;

/// Message printed when the agent produced no usable structured response.
pub const NO_STRUCTURED_RESPONSE: &str = "No structured response found.";

/// Final research report. All four fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResponse {
    /// The research topic.
    pub topic: String,
    /// A concise summary of the research findings.
    pub summary: String,
    /// Sources referenced in the research (URLs or titles).
    pub sources: Vec<String>,
    /// Tools used during the research process.
    pub tools_used: Vec<String>,
}

impl ResearchResponse {
    /// Schema the agent's final answer is coerced into.
    pub fn output_schema() -> OutputSchema {
        OutputSchema::new(
            "research_response",
            "A structured research report",
            json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "The research topic"
                    },
                    "summary": {
                        "type": "string",
                        "description": "A concise summary of the research findings"
                    },
                    "sources": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "A list of sources referenced in the research"
                    },
                    "tools_used": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "A list of tools used during the research process"
                    }
                },
                "required": ["topic", "summary", "sources", "tools_used"],
                "additionalProperties": false
            }),
        )
    }

    /// Format the response for display.
    pub fn format_for_display(&self) -> String {
        format!(
            "Topic: {}\nSummary: {}\nSources: {}\nTools Used: {}",
            self.topic,
            self.summary,
            self.sources.join(", "),
            self.tools_used.join(", ")
        )
    }
}

/// What the extractor found on an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Structured(ResearchResponse),
    Missing,
}

impl Extraction {
    pub fn response(&self) -> Option<&ResearchResponse> {
        match self {
            Extraction::Structured(response) => Some(response),
            Extraction::Missing => None,
        }
    }
}

/// Pull a typed report out of an agent outcome.
///
/// Returns `None` when the structured response is absent or does not match
/// the schema.
pub fn extract(outcome: &AgentOutcome) -> Option<ResearchResponse> {
    let value = outcome.structured_response.as_ref()?;
    match serde_json::from_value(value.clone()) {
        Ok(response) => Some(response),
        Err(e) => {
            warn!("Structured response does not match the research schema: {}", e);
            None
        }
    }
}

/// Write either the four-field report or the fallback message.
pub fn render<W: Write>(outcome: &AgentOutcome, out: &mut W) -> io::Result<Extraction> {
    match extract(outcome) {
        Some(response) => {
            writeln!(out, "{}", response.format_for_display())?;
            Ok(Extraction::Structured(response))
        }
        None => {
            writeln!(out, "{}", NO_STRUCTURED_RESPONSE)?;
            Ok(Extraction::Missing)
        }
    }
}
