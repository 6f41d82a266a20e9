//! Turns a research topic into the agent's input.

use crate::agent::InputMessage;

/// Prompt shown when asking for a topic interactively.
pub const TOPIC_PROMPT: &str = "What can I help you research? ";

/// A research topic exactly as the user supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchRequest {
    topic: String,
}

impl ResearchRequest {
    /// Wrap a topic. No validation: empty or odd topics pass through unchanged.
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The single user message addressed to the agent.
    pub fn into_messages(self) -> Vec<InputMessage> {
        vec![InputMessage::user(&self.topic)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Role;

    #[test]
    fn test_single_user_message() {
        let messages = ResearchRequest::new("Rust async runtimes").into_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Rust async runtimes");
    }

    #[test]
    fn test_topic_passes_through_unchanged() {
        for topic in ["", "   ", "multi\nline?", "ü & <b>"] {
            let messages = ResearchRequest::new(topic).into_messages();
            assert_eq!(messages[0].content, topic);
        }
    }
}
