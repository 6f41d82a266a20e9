//! Research pipeline: request building, agent invocation and report extraction.

mod pipeline;
mod request;
mod response;

pub use pipeline::ResearchPipeline;
pub use request::{ResearchRequest, TOPIC_PROMPT};
pub use response::{extract, render, Extraction, ResearchResponse, NO_STRUCTURED_RESPONSE};
