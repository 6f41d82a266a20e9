//! Wikipedia lookup through the MediaWiki API.

use super::{required_str, Tool, ToolDescriptor};
use crate::config::WikiSettings;
use crate::error::{DelveError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

const NAME: &str = "wikipedia";
const DESCRIPTION: &str = "A wrapper around Wikipedia. Useful for when you need to answer general \
    questions about people, places, companies, facts, historical events, or other subjects. \
    Input should be a search query.";
const NO_RESULT: &str = "No good Wikipedia Search Result was found";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: ExtractQuery,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    missing: bool,
}

/// Encyclopedia lookup returning page summaries.
pub struct WikiTool {
    descriptor: ToolDescriptor,
    http: reqwest::Client,
    api_url: String,
    top_k_results: usize,
    doc_content_chars_max: usize,
}

impl WikiTool {
    pub fn new(http: reqwest::Client, settings: &WikiSettings) -> Result<Self> {
        Ok(Self {
            descriptor: ToolDescriptor::new(NAME, DESCRIPTION)?,
            http,
            api_url: settings.api_url.clone(),
            top_k_results: settings.top_k_results,
            doc_content_chars_max: settings.doc_content_chars_max,
        })
    }

    /// Titles of the best matching pages, best first.
    async fn search_titles(&self, query: &str) -> Result<Vec<String>> {
        let limit = self.top_k_results.to_string();
        let response: SearchResponse = self
            .http
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .query
            .search
            .into_iter()
            .map(|hit| hit.title)
            .take(self.top_k_results)
            .collect())
    }

    /// Plain-text intro of a page, if it exists.
    async fn page_summary(&self, title: &str) -> Result<Option<(String, String)>> {
        let response: ExtractResponse = self
            .http
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .query
            .pages
            .into_iter()
            .find(|p| !p.missing)
            .and_then(|p| p.extract.map(|extract| (p.title, extract))))
    }

    async fn lookup(&self, query: &str) -> Result<String> {
        info!("Looking up Wikipedia for: {}", query);

        let titles = self.search_titles(query).await?;
        debug!("Wikipedia search matched {:?}", titles);

        let mut pages = Vec::with_capacity(titles.len());
        for title in &titles {
            if let Some(page) = self.page_summary(title).await? {
                pages.push(page);
            }
        }

        Ok(format_pages(&pages, self.doc_content_chars_max))
    }
}

#[async_trait]
impl Tool for WikiTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Subject to look up on Wikipedia"
                }
            },
            "required": ["query"]
        })
    }

    fn primary_argument(&self) -> &str {
        "query"
    }

    async fn call(&self, args: &Value) -> Result<String> {
        let query = required_str(args, "query")?;
        self.lookup(query)
            .await
            .map_err(|e| DelveError::tool(NAME, e.to_string()))
    }
}

/// Format `(title, summary)` pairs and cap the result at `max_chars` characters.
pub fn format_pages(pages: &[(String, String)], max_chars: usize) -> String {
    let summaries: Vec<String> = pages
        .iter()
        .filter(|(_, summary)| !summary.trim().is_empty())
        .map(|(title, summary)| format!("Page: {}\nSummary: {}", title, summary.trim()))
        .collect();

    if summaries.is_empty() {
        return NO_RESULT.to_string();
    }

    summaries.join("\n\n").chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, summary: &str) -> (String, String) {
        (title.to_string(), summary.to_string())
    }

    #[test]
    fn test_format_pages() {
        let pages = vec![
            page("Rust (programming language)", "Rust is a systems language."),
            page("Cargo", "Cargo is Rust's package manager.\n"),
        ];
        assert_eq!(
            format_pages(&pages, 1000),
            "Page: Rust (programming language)\nSummary: Rust is a systems language.\n\n\
             Page: Cargo\nSummary: Cargo is Rust's package manager."
        );
    }

    #[test]
    fn test_format_pages_truncates_by_chars() {
        let pages = vec![page("Zürich", "Größte Stadt der Schweiz.")];
        let text = format_pages(&pages, 20);
        assert_eq!(text.chars().count(), 20);
        assert_eq!(text, "Page: Zürich\nSummary");
    }

    #[test]
    fn test_format_pages_no_results() {
        assert_eq!(format_pages(&[], 1000), NO_RESULT);
        assert_eq!(format_pages(&[page("Empty", "  ")], 1000), NO_RESULT);
    }

    #[test]
    fn test_parse_extract_response() {
        let body = r#"{"batchcomplete":true,"query":{"pages":[
            {"pageid":1,"ns":0,"title":"Rust","extract":"Rust is a language."}
        ]}}"#;
        let response: ExtractResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.query.pages[0].title, "Rust");
        assert_eq!(
            response.query.pages[0].extract.as_deref(),
            Some("Rust is a language.")
        );
    }

    #[test]
    fn test_parse_missing_page() {
        let body = r#"{"query":{"pages":[{"ns":0,"title":"Nope","missing":true}]}}"#;
        let response: ExtractResponse = serde_json::from_str(body).unwrap();
        assert!(response.query.pages[0].missing);
    }
}
