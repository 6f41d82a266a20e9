//! Web search through the DuckDuckGo HTML endpoint.

use super::{required_str, strip_html, Tool, ToolDescriptor};
use crate::config::SearchSettings;
use crate::error::{DelveError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;
use tracing::{debug, info};

const NAME: &str = "search_internet";
const DESCRIPTION: &str = "look up current information on the internet.";

/// A single search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Search tool backed by DuckDuckGo.
pub struct SearchTool {
    descriptor: ToolDescriptor,
    http: reqwest::Client,
    endpoint: String,
    max_results: usize,
}

impl SearchTool {
    pub fn new(http: reqwest::Client, settings: &SearchSettings) -> Result<Self> {
        Ok(Self {
            descriptor: ToolDescriptor::new(NAME, DESCRIPTION)?,
            http,
            endpoint: settings.endpoint.clone(),
            max_results: settings.max_results,
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        info!("Searching the web for: {}", query);

        let html = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let results = extract_results(&html, self.max_results);
        debug!("Search returned {} results", results.len());
        Ok(results)
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
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
        let results = self
            .search(query)
            .await
            .map_err(|e| DelveError::tool(NAME, e.to_string()))?;

        if results.is_empty() {
            return Ok("No good DuckDuckGo Search Result was found".to_string());
        }

        Ok(results
            .iter()
            .map(|r| format!("{}\n{}\nURL: {}", r.title, r.snippet, r.url))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

/// Extract search results from a DuckDuckGo HTML results page.
pub fn extract_results(html: &str, limit: usize) -> Vec<SearchResult> {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    static SNIPPET: OnceLock<Regex> = OnceLock::new();
    let title_re = TITLE.get_or_init(|| {
        Regex::new(r#"(?s)class="result__a"[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#).expect("Invalid regex")
    });
    let snippet_re = SNIPPET.get_or_init(|| {
        Regex::new(r#"(?s)class="result__snippet"[^>]*>(.*?)</(?:a|div|td)>"#).expect("Invalid regex")
    });

    html.split("class=\"result__body\"")
        .skip(1)
        .filter_map(|block| {
            let caps = title_re.captures(block)?;
            let title = strip_html(&caps[2]);
            if title.is_empty() {
                return None;
            }
            let snippet = snippet_re
                .captures(block)
                .map(|c| strip_html(&c[1]))
                .unwrap_or_default();

            Some(SearchResult {
                title,
                snippet,
                url: resolve_link(&caps[1]),
            })
        })
        .take(limit)
        .collect()
}

/// DuckDuckGo wraps result links in a redirect; recover the target URL.
fn resolve_link(href: &str) -> String {
    let href = href.replace("&amp;", "&");
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.clone()
    };

    url::Url::parse(&absolute)
        .ok()
        .and_then(|u| {
            u.query_pairs()
                .find(|(k, _)| k == "uddg")
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or(href)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
<div class="results">
  <div class="result results_links results_links_deep web-result ">
    <div class="links_main links_deep result__body">
      <h2 class="result__title">
        <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc">Rust <b>Programming</b> Language</a>
      </h2>
      <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F">A language empowering everyone to build <b>reliable</b> &amp; efficient software.</a>
    </div>
  </div>
  <div class="result results_links results_links_deep web-result ">
    <div class="links_main links_deep result__body">
      <h2 class="result__title">
        <a rel="nofollow" class="result__a" href="https://doc.rust-lang.org/book/">The Rust Book</a>
      </h2>
      <a class="result__snippet" href="https://doc.rust-lang.org/book/">An introductory book about Rust.</a>
    </div>
  </div>
</div>
"#;

    #[test]
    fn test_extract_results() {
        let results = extract_results(FIXTURE, 10);
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(
            results[0].snippet,
            "A language empowering everyone to build reliable & efficient software."
        );
        assert_eq!(results[0].url, "https://www.rust-lang.org/");

        assert_eq!(results[1].url, "https://doc.rust-lang.org/book/");
    }

    #[test]
    fn test_extract_results_respects_limit() {
        assert_eq!(extract_results(FIXTURE, 1).len(), 1);
    }

    #[test]
    fn test_extract_results_empty_page() {
        assert!(extract_results("<html><body>No results.</body></html>", 5).is_empty());
    }

    #[test]
    fn test_extract_results_is_repeatable() {
        let first = extract_results(FIXTURE, 10);
        for _ in 0..3 {
            assert_eq!(extract_results(FIXTURE, 10), first);
        }
        assert!(extract_results("", 10).is_empty());
        assert_eq!(extract_results(FIXTURE, 10), first);
    }
}
