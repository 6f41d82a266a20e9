//! Doctor command - verify configuration and credentials.

use crate::agent::ToolRegistry;
use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Delve Doctor");
    println!();
    println!("Checking configuration and credentials...\n");

    let mut checks = Vec::new();

    println!("{}", style("Model Provider").bold());
    let provider_checks = vec![
        check_api_key(&settings.model.api_key_env, std::env::var(&settings.model.api_key_env).ok()),
        check_model(settings),
    ];
    for check in &provider_checks {
        check.print();
    }
    checks.extend(provider_checks);

    println!();

    println!("{}", style("Tools").bold());
    let tool_checks = vec![check_tools(settings), check_save_target(&settings.default_save_path())];
    for check in &tool_checks {
        check.print();
    }
    checks.extend(tool_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(&Settings::default_config_path());
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Delve.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Delve is ready to use.");
    }

    Ok(())
}

/// Check the provider API key, masking it in the report.
fn check_api_key(var: &str, value: Option<String>) -> CheckResult {
    let hint = format!("Add {}=... to .env or export it in your shell", var);
    match value {
        Some(key) if key.trim().is_empty() => CheckResult::error(var, "empty", &hint),
        Some(key) if key.chars().count() > 12 => {
            let chars: Vec<char> = key.chars().collect();
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            CheckResult::ok(var, &format!("configured ({}...{})", head, tail))
        }
        Some(_) => CheckResult::warning(var, "set but looks too short", "Double-check the key value"),
        None => CheckResult::error(var, "not set", &hint),
    }
}

/// Report the model request parameters.
fn check_model(settings: &Settings) -> CheckResult {
    let model = &settings.model;
    let endpoint = model.api_base.as_deref().unwrap_or("OpenAI default endpoint");
    let summary = format!(
        "{} via {} (temperature {}, max {} tokens, {} iterations)",
        model.name, endpoint, model.temperature, model.max_tokens, settings.agent.max_iterations
    );

    if settings.agent.max_iterations == 0 {
        CheckResult::error(
            "Model",
            &summary,
            "Set agent.max_iterations to at least 1",
        )
    } else {
        CheckResult::ok("Model", &summary)
    }
}

/// Check that the tool registry builds.
fn check_tools(settings: &Settings) -> CheckResult {
    match ToolRegistry::standard(&settings.tools) {
        Ok(registry) => CheckResult::ok("Registry", &registry.names().join(", ")),
        Err(e) => CheckResult::error("Registry", &e.to_string(), "Check the [tools] config section"),
    }
}

/// Check that the default save file can be appended to.
fn check_save_target(path: &Path) -> CheckResult {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    if path.exists() {
        let size = std::fs::metadata(path)
            .map(|m| format!("{} bytes", m.len()))
            .unwrap_or_else(|_| "unknown size".to_string());
        CheckResult::ok("Save file", &format!("{} ({})", path.display(), size))
    } else if parent.is_dir() {
        CheckResult::ok(
            "Save file",
            &format!("{} (created on first save)", path.display()),
        )
    } else {
        CheckResult::error(
            "Save file",
            &format!("{} (directory missing)", path.display()),
            "Create the directory or change tools.save.default_filename",
        )
    }
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: delve config init (or delve config edit)",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_api_key_is_masked() {
        let result = check_api_key("OPENAI_API_KEY", Some("sk-abcdefghijklmnop1234".to_string()));
        assert_eq!(result.status, CheckStatus::Ok);
        assert_eq!(result.message, "configured (sk-a...1234)");

        assert_eq!(check_api_key("K", None).status, CheckStatus::Error);
        assert_eq!(check_api_key("K", Some(" ".to_string())).status, CheckStatus::Error);
        assert_eq!(check_api_key("K", Some("short".to_string())).status, CheckStatus::Warning);
    }

    #[test]
    fn test_save_target() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(check_save_target(&dir.path().join("out.txt")).status, CheckStatus::Ok);
        assert_eq!(
            check_save_target(&dir.path().join("missing").join("out.txt")).status,
            CheckStatus::Error
        );
        assert_eq!(check_save_target(Path::new("research_output.txt")).status, CheckStatus::Ok);
    }

    #[test]
    fn test_zero_iterations_is_an_error() {
        let mut settings = Settings::default();
        settings.agent.max_iterations = 0;
        assert_eq!(check_model(&settings).status, CheckStatus::Error);
    }
}
