//! Configuration settings for Delve.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub agent: AgentSettings,
    pub research: ResearchSettings,
    pub tools: ToolSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Language model request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Chat model name.
    pub name: String,
    /// Base URL of an OpenAI-compatible API. None uses the OpenAI default.
    pub api_base: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Sampling temperature. Zero keeps answers deterministic.
    pub temperature: f32,
    /// Upper bound on tokens generated per model call.
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: "gpt-4o-mini".to_string(),
            api_base: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.0,
            max_tokens: 1024,
        }
    }
}

/// Tool-use loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Maximum model calls in one invocation before giving up.
    pub max_iterations: usize,
    /// HTTP timeout for a single model request, in seconds.
    pub timeout_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Research command settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSettings {
    /// Topic used by `research --default`.
    pub default_topic: String,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            default_topic: "Compare LangGraph and n8n: which one is better for building LLM \
                applications? Provide a structured simple research report."
                .to_string(),
        }
    }
}

/// Settings for the built-in tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ToolSettings {
    pub search: SearchSettings,
    pub wiki: WikiSettings,
    pub save: SaveSettings,
}

/// Web search tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// DuckDuckGo HTML endpoint.
    pub endpoint: String,
    /// Maximum snippets returned to the model.
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            max_results: 10,
        }
    }
}

/// Encyclopedia lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiSettings {
    /// MediaWiki API endpoint.
    pub api_url: String,
    /// Number of pages summarized per lookup.
    pub top_k_results: usize,
    /// Character cap on the text handed back to the model.
    pub doc_content_chars_max: usize,
}

impl Default for WikiSettings {
    fn default() -> Self {
        Self {
            api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            top_k_results: 2,
            doc_content_chars_max: 1000,
        }
    }
}

/// Save tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSettings {
    /// File appended to when the model does not name one.
    pub default_filename: String,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            default_filename: "research_output.txt".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::DelveError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("delve")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded default save file path.
    pub fn default_save_path(&self) -> PathBuf {
        Self::expand_path(&self.tools.save.default_filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.model.temperature, 0.0);
        assert_eq!(settings.model.max_tokens, 1024);
        assert_eq!(settings.tools.wiki.top_k_results, 2);
        assert_eq!(settings.tools.wiki.doc_content_chars_max, 1000);
        assert_eq!(settings.tools.save.default_filename, "research_output.txt");
        assert_eq!(settings.agent.max_iterations, 10);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [model]
            name = "gpt-4.1"

            [tools.wiki]
            top_k_results = 4
            "#,
        )
        .unwrap();

        assert_eq!(settings.model.name, "gpt-4.1");
        assert_eq!(settings.model.api_key_env, "OPENAI_API_KEY");
        assert_eq!(settings.tools.wiki.top_k_results, 4);
        assert_eq!(settings.tools.wiki.doc_content_chars_max, 1000);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.agent.max_iterations = 3;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.agent.max_iterations, 3);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.model.name, "gpt-4o-mini");
    }
}
