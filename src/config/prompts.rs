//! Prompt templates for Delve.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub research: ResearchPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for the research agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchPrompts {
    /// System instruction. `{{format_instructions}}` is replaced with the output schema text.
    pub system: String,
}

impl Default for ResearchPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a research assistant that generates structured research reports.
Answer the user query and use the available tools when they help.
Record the name of every tool you call in "tools_used" and list the URLs or page titles you relied on in "sources".

{{format_instructions}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let research_path = custom_path.join("research.toml");
            if research_path.exists() {
                let content = std::fs::read_to_string(&research_path)?;
                prompts.research = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// The research system prompt with format instructions filled in.
    pub fn research_system(&self, format_instructions: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert(
            "format_instructions".to_string(),
            format_instructions.to_string(),
        );
        self.render_with_custom(&self.research.system, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.research.system.contains("{{format_instructions}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_research_system_uses_custom_variables() {
        let mut custom = HashMap::new();
        custom.insert("audience".to_string(), "engineers".to_string());
        let mut prompts = Prompts::load(None, Some(&custom)).unwrap();
        prompts.research.system = "Write for {{audience}}.\n{{format_instructions}}".to_string();

        let system = prompts.research_system("Return JSON.");
        assert_eq!(system, "Write for engineers.\nReturn JSON.");
    }

    #[test]
    fn test_load_custom_research_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("research.toml"),
            "system = \"Be brief. {{format_instructions}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.research_system("X"), "Be brief. X");
    }
}
