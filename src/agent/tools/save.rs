//! Append research output to a text file.

use super::{required_str, Tool, ToolDescriptor};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use serde_json::{json, Value};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const NAME: &str = "save_research";
const DESCRIPTION: &str = "Saves research content to a file.";

/// Render one delimited, timestamped output block.
pub fn format_block<Tz: TimeZone>(data: &str, timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "=== Research Output ===\nTimestamp: {}\n\n{}\n\n=== End of Research Output ===\n\n",
        timestamp.format("%Y%m%d_%H%M%S"),
        data
    )
}

/// Append `data` to `path` as a new block and return a confirmation message.
///
/// The file is created if needed and never truncated. There is no locking:
/// concurrent writers may interleave.
pub fn save_to_file(data: &str, path: &Path) -> Result<String> {
    let block = format_block(data, &Local::now());

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(block.as_bytes())?;

    info!("Appended {} bytes to {}", block.len(), path.display());
    Ok(format!("Data successfully saved to {}", path.display()))
}

/// File persistence tool.
pub struct SaveTool {
    descriptor: ToolDescriptor,
    default_path: PathBuf,
}

impl SaveTool {
    pub fn new(default_path: PathBuf) -> Result<Self> {
        Ok(Self {
            descriptor: ToolDescriptor::new(NAME, DESCRIPTION)?,
            default_path,
        })
    }
}

#[async_trait]
impl Tool for SaveTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "data": {
                    "type": "string",
                    "description": "The research content to save"
                },
                "filename": {
                    "type": "string",
                    "description": format!(
                        "File to append to (default: {})",
                        self.default_path.display()
                    )
                }
            },
            "required": ["data"]
        })
    }

    fn primary_argument(&self) -> &str {
        "data"
    }

    async fn call(&self, args: &Value) -> Result<String> {
        let data = required_str(args, "data")?;
        let path = match args["filename"].as_str().filter(|f| !f.trim().is_empty()) {
            Some(name) => PathBuf::from(name),
            None => self.default_path.clone(),
        };

        save_to_file(data, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_block() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(
            format_block("Rust is fast.", &ts),
            "=== Research Output ===\nTimestamp: 20250314_092653\n\nRust is fast.\n\n\
             === End of Research Output ===\n\n"
        );
    }

    #[test]
    fn test_save_appends_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "existing line\n").unwrap();

        let first = save_to_file("first finding", &path).unwrap();
        let second = save_to_file("second finding", &path).unwrap();

        assert!(first.contains(&path.display().to_string()));
        assert!(second.contains(&path.display().to_string()));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("existing line\n=== Research Output ===\n"));
        assert_eq!(content.matches("=== Research Output ===").count(), 2);
        assert_eq!(content.matches("=== End of Research Output ===").count(), 2);
        assert_eq!(content.matches("\nTimestamp: ").count(), 2);
        assert!(content.find("first finding").unwrap() < content.find("second finding").unwrap());
        assert!(content.ends_with("=== End of Research Output ===\n\n"));
    }

    #[test]
    fn test_save_to_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("notes.txt");
        assert!(save_to_file("data", &path).is_err());
    }

    #[tokio::test]
    async fn test_tool_uses_default_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("research_output.txt");
        let other = dir.path().join("other.txt");
        let tool = SaveTool::new(default_path.clone()).unwrap();

        let message = tool.call(&json!({"data": "a"})).await.unwrap();
        assert_eq!(
            message,
            format!("Data successfully saved to {}", default_path.display())
        );

        let message = tool
            .call(&json!({"data": "b", "filename": other.to_str().unwrap()}))
            .await
            .unwrap();
        assert!(message.ends_with(&other.display().to_string()));

        assert!(std::fs::read_to_string(&default_path).unwrap().contains("\na\n"));
        assert!(std::fs::read_to_string(&other).unwrap().contains("\nb\n"));
    }
}
