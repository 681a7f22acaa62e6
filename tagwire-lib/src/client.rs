//! Search endpoint client.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::path;
use crate::transport::HttpTransport;
use crate::transport::Transport;

/// Placeholder token replaced with the percent-encoded query.
pub const QUERY_PLACEHOLDER: &str = "{{value}}";

/// Client for a single remote search endpoint.
///
/// Renders the URL template, performs the GET, and extracts the results
/// array from the JSON response. Cheap to clone; clones share the
/// underlying transport.
///
/// # Example
///
/// ```ignore
/// use tagwire_lib::{SearchClient, SearchConfig};
///
/// let client = SearchClient::new(
///     &SearchConfig::new("https://api.example.com/search?q={{value}}")
///         .results_path("data.results"),
/// );
/// let items = client.search("rust").await?;
/// ```
#[derive(Clone)]
pub struct SearchClient {
    inner: Arc<SearchClientInner>,
}

struct SearchClientInner {
    url_template: String,
    results_path: Option<String>,
    transport: Arc<dyn Transport>,
}

impl SearchClient {
    /// Creates a client with the default HTTP transport.
    ///
    /// Only the template, extraction, and timeout parts of `config` matter
    /// here; `trigger` and `rate` belong to
    /// [`RemoteSearch`](crate::search::RemoteSearch).
    pub fn new(config: &SearchConfig) -> Self {
        let transport = match config.timeout {
            Some(timeout) => HttpTransport::with_timeout(timeout),
            None => HttpTransport::new(),
        };
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client over a caller-supplied transport.
    pub fn with_transport(config: &SearchConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(SearchClientInner {
                url_template: config.url.clone(),
                // An empty path means the response root, same as absent.
                results_path: config.results_path.clone().filter(|p| !p.is_empty()),
                transport,
            }),
        }
    }

    /// `true` when a URL template has been configured.
    pub fn is_configured(&self) -> bool {
        !self.inner.url_template.is_empty()
    }

    /// Renders the URL template for `query`.
    ///
    /// Every [`QUERY_PLACEHOLDER`] occurrence is substituted with the
    /// percent-encoded query, and the result is validated as an absolute
    /// URL.
    pub fn render_url(&self, query: &str) -> Result<String, SearchError> {
        let encoded = urlencoding::encode(query);
        let rendered = self.inner.url_template.replace(QUERY_PLACEHOLDER, &encoded);

        url::Url::parse(&rendered)
            .map_err(|e| SearchError::InvalidUrl(format!("{rendered}: {e}")))?;

        Ok(rendered)
    }

    /// Fetches and extracts search results for `query`.
    ///
    /// Returns the elements of the results array verbatim. Element shape is
    /// the caller's concern; see
    /// [`TagSelection`](crate::selection::TagSelection) for the
    /// canonicalization side.
    pub async fn search(&self, query: &str) -> Result<Vec<Value>, SearchError> {
        let url = self.render_url(query)?;
        let response = self.inner.transport.get(&url).await?;

        if !response.is_success() {
            return Err(SearchError::Http {
                status: response.status,
                message: response.body,
            });
        }

        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        let extracted = match &self.inner.results_path {
            Some(path) => path::walk(&body, path).cloned(),
            None => Some(body),
        };

        match extracted {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(SearchError::UnexpectedShape {
                path: self.results_path_label(),
                found: json_type_name(&other),
            }),
            None => Err(SearchError::UnexpectedShape {
                path: self.results_path_label(),
                found: "nothing",
            }),
        }
    }

    fn results_path_label(&self) -> String {
        self.inner
            .results_path
            .clone()
            .unwrap_or_else(|| "<response root>".to_string())
    }
}

impl fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchClient")
            .field("url_template", &self.inner.url_template)
            .field("results_path", &self.inner.results_path)
            .finish_non_exhaustive()
    }
}

/// JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::transport::TransportResponse;

    /// Serves one canned response for every request.
    struct FixedTransport {
        status: u16,
        body: String,
    }

    impl FixedTransport {
        fn ok(body: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                status: 200,
                body: body.into(),
            })
        }

        fn status(status: u16, body: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.into(),
            })
        }
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn get(&self, _url: &str) -> Result<TransportResponse, SearchError> {
            Ok(TransportResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    fn client(config: SearchConfig, transport: Arc<FixedTransport>) -> SearchClient {
        SearchClient::with_transport(&config, transport)
    }

    #[test]
    fn test_render_url_substitutes_every_occurrence() {
        let config = SearchConfig::new("https://api.example.com/search?q={{value}}&hl={{value}}");
        let client = client(config, FixedTransport::ok("[]"));

        let url = client.render_url("rust lang").unwrap();
        assert_eq!(
            url,
            "https://api.example.com/search?q=rust%20lang&hl=rust%20lang"
        );
    }

    #[test]
    fn test_render_url_rejects_invalid_template() {
        let config = SearchConfig::new("not a url {{value}}");
        let client = client(config, FixedTransport::ok("[]"));

        let error = client.render_url("x").unwrap_err();
        assert!(matches!(error, SearchError::InvalidUrl(_)));
    }

    #[test]
    fn test_is_configured() {
        let unset = client(SearchConfig::default(), FixedTransport::ok("[]"));
        assert!(!unset.is_configured());

        let set = client(
            SearchConfig::new("https://api.example.com/{{value}}"),
            FixedTransport::ok("[]"),
        );
        assert!(set.is_configured());
    }

    #[tokio::test]
    async fn test_search_extracts_nested_results() {
        let body = r#"{"data": {"results": [{"id": 1, "name": "Cat"}]}}"#;
        let config = SearchConfig::new("https://api.example.com/search?q={{value}}")
            .results_path("data.results");
        let client = client(config, FixedTransport::ok(body));

        let items = client.search("cat").await.unwrap();
        assert_eq!(items, vec![json!({"id": 1, "name": "Cat"})]);
    }

    #[tokio::test]
    async fn test_search_uses_response_root_without_path() {
        let config = SearchConfig::new("https://api.example.com/search?q={{value}}");
        let client = client(config, FixedTransport::ok(r#"["a", "b"]"#));

        let items = client.search("x").await.unwrap();
        assert_eq!(items, vec![json!("a"), json!("b")]);
    }

    #[tokio::test]
    async fn test_search_treats_empty_results_path_as_response_root() {
        let mut config = SearchConfig::new("https://api.example.com/search?q={{value}}");
        config.results_path = Some(String::new());
        let client = client(config, FixedTransport::ok(r#"[{"id": 1}]"#));

        let items = client.search("x").await.unwrap();
        assert_eq!(items, vec![json!({"id": 1})]);
    }

    #[tokio::test]
    async fn test_search_rejects_non_array_at_path() {
        let config = SearchConfig::new("https://api.example.com/search?q={{value}}")
            .results_path("data");
        let client = client(config, FixedTransport::ok(r#"{"data": {"count": 3}}"#));

        let error = client.search("x").await.unwrap_err();
        assert!(matches!(
            error,
            SearchError::UnexpectedShape {
                found: "object",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_search_rejects_missing_path() {
        let config = SearchConfig::new("https://api.example.com/search?q={{value}}")
            .results_path("data.results");
        let client = client(config, FixedTransport::ok(r#"{"data": {}}"#));

        let error = client.search("x").await.unwrap_err();
        assert!(matches!(
            error,
            SearchError::UnexpectedShape {
                found: "nothing",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_search_surfaces_http_errors() {
        let config = SearchConfig::new("https://api.example.com/search?q={{value}}");
        let client = client(config, FixedTransport::status(500, "boom"));

        let error = client.search("x").await.unwrap_err();
        assert_eq!(error.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_search_rejects_invalid_json() {
        let config = SearchConfig::new("https://api.example.com/search?q={{value}}");
        let client = client(config, FixedTransport::ok("<html>nope</html>"));

        let error = client.search("x").await.unwrap_err();
        assert!(matches!(error, SearchError::Parse(_)));
    }
}
