//! Job search tool backed by the SerpAPI Google Jobs engine

use super::{Tool, ToolOutput};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const ENGINE: &str = "google_jobs";
const SEPARATOR: &str = "_______________________________________________";

/// Connection settings for the search backend
#[derive(Debug, Clone)]
pub struct JobSearchConfig {
    pub api_key: String,
    pub base_url: String,
    /// Listings included in one tool result
    pub max_results: usize,
}

impl JobSearchConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://serpapi.com/search.json";
    pub const DEFAULT_MAX_RESULTS: usize = 1;
}

/// Searches job postings for a free-text query
pub struct JobSearchTool {
    client: Client,
    config: JobSearchConfig,
}

#[derive(Debug, Deserialize)]
struct JobSearchInput {
    query: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    jobs_results: Vec<JobListing>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobListing {
    title: Option<String>,
    company_name: Option<String>,
    location: Option<String>,
    via: Option<String>,
    description: Option<String>,
}

impl JobSearchTool {
    pub fn new(config: JobSearchConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self { client, config })
    }

    async fn search(&self, query: &str) -> Result<String, String> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("engine", ENGINE),
                ("q", query),
                ("api_key", self.config.api_key.as_str()),
            ])
            .send()
            .await
            // The request URL carries the api key
            .map_err(|e| format!("Search request failed: {}", e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read search response: {}", e.without_url()))?;

        if !status.is_success() {
            return Err(format!("Search API returned HTTP {status}: {body}"));
        }

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| format!("Failed to parse search response: {e}"))?;

        format_listings(query, parsed, self.config.max_results)
    }
}

/// Render listings as plain text for the model and the user
fn format_listings(
    query: &str,
    response: SearchResponse,
    max_results: usize,
) -> Result<String, String> {
    if response.jobs_results.is_empty() {
        // SerpAPI reports an empty result set through the error field
        return match response.error {
            Some(error) if !error.contains("hasn't returned any results") => {
                Err(format!("Search API error: {error}"))
            }
            _ => Ok(format!("No job postings were found for \"{query}\".")),
        };
    }

    let mut out = String::new();
    for listing in response.jobs_results.iter().take(max_results.max(1)) {
        out.push_str(SEPARATOR);
        out.push('\n');
        let fields = [
            ("Job Title", &listing.title),
            ("Company", &listing.company_name),
            ("Location", &listing.location),
            ("Via", &listing.via),
            ("Description", &listing.description),
        ];
        for (label, value) in fields {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                out.push_str(&format!("{label}: {value}\n"));
            }
        }
    }
    Ok(out.trim_end().to_string())
}

#[async_trait]
impl Tool for JobSearchTool {
    fn name(&self) -> &'static str {
        "job_search"
    }

    fn description(&self) -> String {
        "Search current job postings. Takes a free-text query such as a role, field and location, and returns the matching posting(s) with title, company, location and description.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for, e.g. \"frontend developer remote\""
                }
            }
        })
    }

    async fn run(&self, input: Value) -> ToolOutput {
        let input: JobSearchInput = match serde_json::from_value(input) {
            Ok(i) => i,
            Err(e) => return ToolOutput::error(format!("Invalid input: {e}")),
        };
        if input.query.trim().is_empty() {
            return ToolOutput::error("Search query is empty");
        }

        tracing::info!(query = %input.query, "Searching job postings");
        match self.search(&input.query).await {
            Ok(text) => ToolOutput::success(text),
            Err(e) => {
                tracing::warn!(query = %input.query, error = %e, "Job search failed");
                ToolOutput::error(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> JobSearchTool {
        tool_with_key("test")
    }

    fn tool_with_key(api_key: &str) -> JobSearchTool {
        JobSearchTool::new(JobSearchConfig {
            api_key: api_key.to_string(),
            // Nothing listens here; requests fail fast
            base_url: "http://127.0.0.1:9/search.json".to_string(),
            max_results: 1,
        })
        .unwrap()
    }

    fn response(value: Value) -> SearchResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_format_first_listing() {
        let resp = response(json!({
            "jobs_results": [
                {
                    "title": "Frontend Engineer",
                    "company_name": "Acme",
                    "location": "Berlin",
                    "via": "LinkedIn",
                    "description": "Build UIs with React."
                },
                {"title": "Second Job", "company_name": "Other"}
            ]
        }));

        let text = format_listings("frontend", resp, 1).unwrap();
        assert!(text.starts_with(SEPARATOR));
        assert!(text.contains("Job Title: Frontend Engineer"));
        assert!(text.contains("Company: Acme"));
        assert!(text.contains("Location: Berlin"));
        assert!(text.contains("Description: Build UIs with React."));
        assert!(!text.contains("Second Job"));
    }

    #[test]
    fn test_format_respects_max_results_and_skips_missing_fields() {
        let resp = response(json!({
            "jobs_results": [
                {"title": "One", "location": "  "},
                {"title": "Two"},
                {"title": "Three"}
            ]
        }));

        let text = format_listings("q", resp, 2).unwrap();
        assert!(text.contains("Job Title: One"));
        assert!(text.contains("Job Title: Two"));
        assert!(!text.contains("Three"));
        assert!(!text.contains("Location:"));
        assert_eq!(text.matches(SEPARATOR).count(), 2);
    }

    #[test]
    fn test_no_results() {
        let resp = response(json!({
            "error": "Google hasn't returned any results for this query."
        }));
        let text = format_listings("underwater basket weaving", resp, 1).unwrap();
        assert_eq!(
            text,
            "No job postings were found for \"underwater basket weaving\"."
        );

        let text = format_listings("x", response(json!({})), 1).unwrap();
        assert!(text.starts_with("No job postings"));
    }

    #[test]
    fn test_api_error_is_failure() {
        let resp = response(json!({"error": "Invalid API key."}));
        let err = format_listings("x", resp, 1).unwrap_err();
        assert!(err.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let result = tool().run(json!({"q": "oops"})).await;
        assert!(!result.success);
        assert!(result.output.starts_with("Invalid input"));

        let result = tool().run(json!({"query": "  "})).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_error() {
        let result = tool().run(json!({"query": "rust developer"})).await;
        assert!(!result.success);
        assert!(result.output.starts_with("Search request failed"));
    }

    #[tokio::test]
    async fn test_failed_search_hides_api_key() {
        let result = tool_with_key("SECRET_SERP_KEY")
            .run(json!({"query": "rust developer"}))
            .await;
        assert!(!result.success);
        assert!(result.output.starts_with("Search request failed"));
        assert!(!result.output.contains("SECRET_SERP_KEY"));
        assert!(!result.output.contains("api_key"));
    }

    #[test]
    fn test_schema_requires_query() {
        let schema = tool().input_schema();
        assert_eq!(schema["required"][0], "query");
    }
}
