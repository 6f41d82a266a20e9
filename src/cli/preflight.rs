//! Pre-flight checks before calling the model provider.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{DelveError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Research needs the provider API key.
    Research,
    /// Saving only touches the local filesystem.
    Save,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Research => {
            check_api_key(&settings.model.api_key_env)?;
        }
        Operation::Save => {
            // No external requirements for saving
        }
    }
    Ok(())
}

/// Check if the provider API key is configured.
fn check_api_key(var: &str) -> Result<()> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        Ok(_) => Err(DelveError::Config(format!(
            "{} is empty. Set it in .env or with: export {}='sk-...'",
            var, var
        ))),
        Err(_) => Err(DelveError::Config(format!(
            "{} not set. Set it in .env or with: export {}='sk-...'",
            var, var
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_save_no_requirements() {
        assert!(check(Operation::Save, &Settings::default()).is_ok());
    }

    #[test]
    fn test_check_research_missing_key() {
        let mut settings = Settings::default();
        settings.model.api_key_env = "DELVE_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        let err = check(Operation::Research, &settings).unwrap_err();
        assert!(err.to_string().contains("DELVE_TEST_KEY_THAT_IS_NEVER_SET not set"));
    }
}
