//! Web search tool.
//!
//! Runs a neural web search through the Exa API and returns trimmed result
//! snippets. The outbound request always asks for textual content and lets the
//! provider broaden the query interpretation; optional domain and crawl-date
//! filters are forwarded only when the caller provided them.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::Config;
use crate::domains::tools::ToolError;
use crate::upstream::UpstreamClient;

/// Maximum snippet length per result, in characters.
const SNIPPET_MAX_CHARS: usize = 500;

/// Parameters for the web search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// The search query.
    #[schemars(description = "The search query")]
    pub query: String,

    /// Number of results to return (default: 5).
    #[schemars(description = "Number of results to return (default: 5)")]
    #[serde(default = "default_num_results")]
    pub num_results: u32,

    /// Only include results from these domains.
    #[schemars(description = "Only include results from these domains")]
    pub include_domains: Option<Vec<String>>,

    /// Exclude results from these domains.
    #[schemars(description = "Exclude results from these domains")]
    pub exclude_domains: Option<Vec<String>>,

    /// Only include pages crawled after this date (ISO 8601).
    #[schemars(description = "Only include pages crawled after this date (ISO 8601)")]
    pub start_crawl_date: Option<String>,

    /// Only include pages crawled before this date (ISO 8601).
    #[schemars(description = "Only include pages crawled before this date (ISO 8601)")]
    pub end_crawl_date: Option<String>,
}

fn default_num_results() -> u32 {
    5
}

/// Upstream response envelope. A missing `results` array is a format error.
#[derive(Debug, Deserialize)]
struct ExaEnvelope {
    results: Vec<ExaResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExaResult {
    title: Option<String>,
    url: Option<String>,
    text: Option<String>,
    score: Option<f64>,
    published_date: Option<String>,
}

/// One mapped search result with a bounded text snippet.
#[derive(Debug, Serialize)]
struct SearchResultItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    published_date: Option<String>,
}

/// Structured payload returned to the caller.
#[derive(Debug, Serialize)]
struct WebSearchData {
    results: Vec<SearchResultItem>,
    total_results: usize,
    query: String,
}

/// Web search tool implementation.
#[derive(Debug, Clone)]
pub struct WebSearchTool;

impl WebSearchTool {
    /// Tool name as registered in the gateway.
    pub const NAME: &'static str = "search";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search the web with Exa's neural search. Returns result titles, URLs, relevance scores, publication dates, and a text snippet of up to 500 characters per result. Supports domain and crawl-date filters.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<WebSearchParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Validate arguments and execute.
    pub async fn run(
        arguments: serde_json::Value,
        config: &Config,
        client: &UpstreamClient,
    ) -> Result<serde_json::Value, ToolError> {
        let params: WebSearchParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
        Self::execute(&params, config, client).await
    }

    /// Execute the tool logic: one upstream POST, reshaped into the payload.
    async fn execute(
        params: &WebSearchParams,
        config: &Config,
        client: &UpstreamClient,
    ) -> Result<serde_json::Value, ToolError> {
        let api_key = config
            .credentials
            .exa_api_key
            .as_deref()
            .ok_or_else(|| ToolError::config("EXA_API_KEY is not configured"))?;

        let url = format!("{}/search", config.upstream.exa_base_url);
        let body = Self::build_request(params);

        info!(
            "Searching the web ({} results requested)",
            params.num_results
        );
        let response = client
            .post_json(&url, &[("x-api-key", api_key)], &body)
            .await?;

        if !response.is_success() {
            return Err(ToolError::upstream_http(response.status, response.body));
        }

        let envelope: ExaEnvelope = serde_json::from_str(&response.body)
            .map_err(|_| ToolError::upstream_format(response.body.clone()))?;

        let results: Vec<SearchResultItem> = envelope
            .results
            .into_iter()
            .map(|r| SearchResultItem {
                title: r.title,
                url: r.url,
                text: r.text.as_deref().map(truncate_snippet),
                score: r.score,
                published_date: r.published_date,
            })
            .collect();

        let data = WebSearchData {
            total_results: results.len(),
            results,
            query: params.query.clone(),
        };

        serde_json::to_value(data).map_err(|e| ToolError::internal(e.to_string()))
    }

    /// Build the outbound request body.
    ///
    /// `useAutoprompt` and `contents.text` are always set; optional filters are
    /// included iff the caller provided them.
    fn build_request(params: &WebSearchParams) -> serde_json::Value {
        let mut body = serde_json::json!({
            "query": params.query,
            "numResults": params.num_results,
            "useAutoprompt": true,
            "contents": {"text": true},
        });

        if let Some(domains) = &params.include_domains {
            body["includeDomains"] = serde_json::json!(domains);
        }
        if let Some(domains) = &params.exclude_domains {
            body["excludeDomains"] = serde_json::json!(domains);
        }
        if let Some(date) = &params.start_crawl_date {
            body["startCrawlDate"] = serde_json::json!(date);
        }
        if let Some(date) = &params.end_crawl_date {
            body["endCrawlDate"] = serde_json::json!(date);
        }

        body
    }
}

/// Take the first [`SNIPPET_MAX_CHARS`] characters, marking truncation with a
/// trailing `...` iff the original text was longer.
fn truncate_snippet(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(SNIPPET_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_config(base_url: &str) -> Config {
        let mut config = Config::default();
        config.credentials.exa_api_key = Some("test-key".to_string());
        config.upstream.exa_base_url = base_url.to_string();
        config
    }

    #[test]
    fn test_truncate_short_text_unmodified() {
        assert_eq!(truncate_snippet("hello"), "hello");
    }

    #[test]
    fn test_truncate_exactly_500_has_no_marker() {
        let text = "a".repeat(500);
        assert_eq!(truncate_snippet(&text), text);
    }

    #[test]
    fn test_truncate_501_gets_marker() {
        let text = "a".repeat(501);
        let snippet = truncate_snippet(&text);
        assert_eq!(snippet.len(), 503);
        assert!(snippet.ends_with("..."));
        assert_eq!(&snippet[..500], &text[..500]);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "ß".repeat(501);
        let snippet = truncate_snippet(&text);
        assert_eq!(snippet.chars().count(), 503);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_request_body_fixed_flags() {
        let params: WebSearchParams =
            serde_json::from_value(serde_json::json!({"query": "wheat prices"})).unwrap();
        let body = WebSearchTool::build_request(&params);

        assert_eq!(body["query"], "wheat prices");
        assert_eq!(body["numResults"], 5);
        assert_eq!(body["useAutoprompt"], true);
        assert_eq!(body["contents"]["text"], true);
        assert!(body.get("includeDomains").is_none());
        assert!(body.get("excludeDomains").is_none());
        assert!(body.get("startCrawlDate").is_none());
        assert!(body.get("endCrawlDate").is_none());
    }

    #[test]
    fn test_request_body_optional_fields_iff_present() {
        let params: WebSearchParams = serde_json::from_value(serde_json::json!({
            "query": "wheat",
            "num_results": 3,
            "include_domains": ["gov.in"],
            "start_crawl_date": "2024-01-01",
        }))
        .unwrap();
        let body = WebSearchTool::build_request(&params);

        assert_eq!(body["numResults"], 3);
        assert_eq!(body["includeDomains"], serde_json::json!(["gov.in"]));
        assert_eq!(body["startCrawlDate"], "2024-01-01");
        assert!(body.get("excludeDomains").is_none());
        assert!(body.get("endCrawlDate").is_none());
    }

    #[tokio::test]
    async fn test_missing_query_is_invalid_arguments() {
        let config = test_config("http://unused.invalid");
        let client = UpstreamClient::new();
        let err = WebSearchTool::run(serde_json::json!({}), &config, &client)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_success_maps_results_in_order() {
        let mut server = mockito::Server::new_async().await;
        let config = test_config(&server.url());
        let long_text = "x".repeat(600);
        let _mock = server
            .mock("POST", "/search")
            .match_header("x-api-key", "test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "query": "mandi prices",
                "numResults": 2,
                "useAutoprompt": true,
                "contents": {"text": true},
            })))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "results": [
                        {
                            "title": "First",
                            "url": "https://example.com/a",
                            "text": long_text,
                            "score": 0.91,
                            "publishedDate": "2024-05-01"
                        },
                        {
                            "title": "Second",
                            "url": "https://example.com/b",
                            "text": "short"
                        }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = UpstreamClient::new();
        let data = WebSearchTool::run(
            serde_json::json!({"query": "mandi prices", "num_results": 2}),
            &config,
            &client,
        )
        .await
        .unwrap();

        assert_eq!(data["total_results"], 2);
        assert_eq!(data["query"], "mandi prices");

        let results = data["results"].as_array().unwrap();
        assert_eq!(results[0]["title"], "First");
        assert_eq!(results[0]["score"], 0.91);
        assert_eq!(results[0]["published_date"], "2024-05-01");
        let snippet = results[0]["text"].as_str().unwrap();
        assert_eq!(snippet.len(), 503);
        assert!(snippet.ends_with("..."));

        assert_eq!(results[1]["title"], "Second");
        assert_eq!(results[1]["text"], "short");
        assert!(results[1].get("score").is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_no_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .expect(0)
            .create_async()
            .await;

        let mut config = test_config(&server.url());
        config.credentials.exa_api_key = None;

        let client = UpstreamClient::new();
        let err = WebSearchTool::run(serde_json::json!({"query": "q"}), &config, &client)
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::Config(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upstream_error_status_surfaces_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let config = test_config(&server.url());
        let _mock = server
            .mock("POST", "/search")
            .with_status(401)
            .with_body(r#"{"error":"invalid api key"}"#)
            .create_async()
            .await;

        let client = UpstreamClient::new();
        let err = WebSearchTool::run(serde_json::json!({"query": "q"}), &config, &client)
            .await
            .unwrap_err();

        match err {
            ToolError::UpstreamHttp { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid api key"));
            }
            other => panic!("expected UpstreamHttp, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_body_without_results_is_a_format_error() {
        let mut server = mockito::Server::new_async().await;
        let config = test_config(&server.url());
        let _mock = server
            .mock("POST", "/search")
            .with_status(200)
            .with_body(r#"{"message":"ok"}"#)
            .create_async()
            .await;

        let client = UpstreamClient::new();
        let err = WebSearchTool::run(serde_json::json!({"query": "q"}), &config, &client)
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::UpstreamFormat { .. }));
    }

    #[test]
    fn test_tool_metadata() {
        let tool = WebSearchTool::to_tool();
        assert_eq!(tool.name, WebSearchTool::NAME);
        assert!(tool.description.is_some());

        let schema = serde_json::to_value(tool.input_schema.as_ref()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for field in [
            "query",
            "num_results",
            "include_domains",
            "exclude_domains",
            "start_crawl_date",
            "end_crawl_date",
        ] {
            assert!(properties.contains_key(field), "schema missing {field}");
        }
    }
}
